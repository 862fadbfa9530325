//! User-facing Hebrew strings. The UI is right-to-left; units stay Latin.

pub const DEFAULT_CATEGORY: &str = "כללי";

pub const TAB_PROTOCOLS: &str = "פרוטוקולים";
pub const TAB_TOOLS: &str = "כלים";
pub const SEARCH_PLACEHOLDER: &str = "חיפוש פרוטוקול, תרופה או מינון…";

pub const ALL_PROTOCOLS: &str = "כל הפרוטוקולים";
pub const RESULTS_SUFFIX: &str = "תוצאות";
pub const PAGE: &str = "עמ׳";
pub const SEARCH_PILL: &str = "חיפוש";
pub const LOADING: &str = "טוען נתונים…";

pub const CATEGORY: &str = "קטגוריה";
pub const BACK: &str = "חזרה";
pub const COPY: &str = "העתקה";
pub const COPIED: &str = "הועתק";
pub const COPY_FAILED: &str = "לא ניתן להעתיק";
pub const PRINT: &str = "הדפסה";
pub const HIGHLIGHT_ON: &str = "הדגשה: פועלת";
pub const HIGHLIGHT_OFF: &str = "הדגשה: כבויה";

pub const NOT_FOUND_TITLE: &str = "לא נמצא";
pub const NOT_FOUND_BODY: &str = "הפרוטוקול לא קיים בקובץ הנתונים.";

pub const LOAD_ERROR_TITLE: &str = "שגיאה בטעינת נתונים";

pub const TOOLS_TITLE: &str = "כלים מהירים";
pub const TOOLS_DISCLAIMER: &str =
    "מחשבונים כלליים לשימוש קליני. יש לוודא מינונים/ריכוזים מול מקור מוסמך.";
pub const COMPUTE: &str = "חישוב";
pub const CLEAR: &str = "איפוס";

pub const DOSE_TITLE: &str = "מחשבון מינון (mg/kg)";
pub const DOSE_PROMPT: &str = "הזן משקל ומינון כדי לקבל תוצאה.";
pub const DOSE_INVALID: &str = "נא להזין משקל ו-mg/kg תקינים.";
pub const WEIGHT_KG: &str = "משקל (ק״ג)";
pub const DOSE_MG_KG: &str = "מינון (mg/kg)";
pub const MAX_MG: &str = "מקסימום (mg) — אופציונלי";
pub const FREQUENCY: &str = "תדירות — אופציונלי";
pub const RESULT: &str = "תוצאה";
pub const CALCULATION: &str = "חישוב";
pub const FREQUENCY_LINE: &str = "תדירות";

pub const INFUSION_TITLE: &str = "מחשבון אינפוזיה (mcg/kg/min → mL/hr)";
pub const INFUSION_PROMPT: &str = "הזן נתונים כדי לקבל קצב מתן ב-mL/hr.";
pub const INFUSION_INVALID: &str = "נא להזין ערכים תקינים.";
pub const BAG_MG: &str = "כמות תרופה בשקית (mg)";
pub const BAG_ML: &str = "נפח שקית (mL)";
pub const TARGET_MCG_KG_MIN: &str = "מטרה (mcg/kg/min)";
pub const RATE: &str = "קצב מתן";
pub const CONCENTRATION: &str = "ריכוז";
pub const DOSE_RATE: &str = "מינון";

/// Disclosure appended to the dose explanation when the maximum applied.
pub fn capped_note(max_mg: f64) -> String {
    format!("(הוגבל למקסימום {max_mg} mg)")
}

/// Guidance shown under a load failure.
pub fn load_error_hint(data_url: &str) -> String {
    format!("ודא/י ש-{data_url} קיים ושהאתר מוגש דרך שרת (לא כקובץ מקומי).")
}
