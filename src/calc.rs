//! Bedside calculators. Pure functions over already-parsed numbers; the
//! form layer parses text with [`parse_number`] first.

use thiserror::Error;

use crate::labels;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    #[error("weight and mg/kg must be positive numbers")]
    InvalidDoseInput,
    #[error("all infusion inputs must be positive numbers")]
    InvalidInfusionInput,
}

impl CalcError {
    /// Inline message for the calculator's result area.
    pub fn message(self) -> &'static str {
        match self {
            CalcError::InvalidDoseInput => labels::DOSE_INVALID,
            CalcError::InvalidInfusionInput => labels::INFUSION_INVALID,
        }
    }
}

/// Parses a form field, accepting a decimal comma.
///
/// Blank or non-finite input yields `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

// Enough places to print any f64 without rounding.
const EXACT_PLACES: usize = 1074;

/// Fixed-point text with exact ties rounded away from zero, matching
/// `Number.prototype.toFixed`. `{:.N}` would round ties to even.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let exact = format!("{:.*}", EXACT_PLACES, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let kept = fraction.get(..digits).unwrap_or(fraction);
    let round_up = fraction
        .as_bytes()
        .get(digits)
        .is_some_and(|digit| *digit >= b'5');

    let mut text = if digits == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{kept}")
    };
    if round_up {
        text = increment_last_digit(&text);
    }
    if value < 0.0 {
        text.insert(0, '-');
    }
    text
}

fn increment_last_digit(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            '.' => {}
            '9' => *c = '0',
            d => {
                *c = char::from(d as u8 + 1);
                return chars.into_iter().collect();
            }
        }
    }
    std::iter::once('1').chain(chars).collect()
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoseResult {
    pub weight_kg: f64,
    pub dose_mg_per_kg: f64,
    /// Unclamped `weight × dose`.
    pub raw_mg: f64,
    /// What to give: `raw_mg`, or the maximum when that was lower.
    pub dose_mg: f64,
    /// Set when the maximum was applied.
    pub capped_at_mg: Option<f64>,
    pub frequency: Option<String>,
}

impl DoseResult {
    /// Whole milligrams from 10 up, two decimals below.
    pub fn dose_display(&self) -> String {
        let digits = if self.dose_mg >= 10.0 { 0 } else { 2 };
        to_fixed(self.dose_mg, digits)
    }

    /// `"10×5 = 50.00 mg"`, followed by the cap disclosure if any.
    pub fn explanation(&self) -> String {
        let mut line = format!(
            "{}×{} = {} mg",
            self.weight_kg,
            self.dose_mg_per_kg,
            to_fixed(self.raw_mg, 2)
        );
        if let Some(max) = self.capped_at_mg {
            line.push(' ');
            line.push_str(&labels::capped_note(max));
        }
        line
    }
}

pub fn calc_dose(
    weight_kg: Option<f64>,
    dose_mg_per_kg: Option<f64>,
    max_mg: Option<f64>,
    frequency: &str,
) -> Result<DoseResult, CalcError> {
    let (Some(weight_kg), Some(dose_mg_per_kg)) = (positive(weight_kg), positive(dose_mg_per_kg))
    else {
        return Err(CalcError::InvalidDoseInput);
    };

    let raw_mg = weight_kg * dose_mg_per_kg;
    let capped_at_mg = positive(max_mg).filter(|max| raw_mg > *max);
    let frequency = frequency.trim();

    Ok(DoseResult {
        weight_kg,
        dose_mg_per_kg,
        raw_mg,
        dose_mg: capped_at_mg.unwrap_or(raw_mg),
        capped_at_mg,
        frequency: (!frequency.is_empty()).then(|| frequency.to_string()),
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct InfusionResult {
    pub concentration_mcg_per_ml: f64,
    pub dose_mcg_per_min: f64,
    pub ml_per_min: f64,
    pub ml_per_hr: f64,
}

impl InfusionResult {
    pub fn rate_display(&self) -> String {
        format!("{} mL/hr", to_fixed(self.ml_per_hr, 2))
    }

    pub fn concentration_display(&self) -> String {
        format!("{} mcg/mL", to_fixed(self.concentration_mcg_per_ml, 2))
    }

    /// `"2.00 mcg/min → 0.0200 mL/min"`.
    pub fn flow_display(&self) -> String {
        format!(
            "{} mcg/min → {} mL/min",
            to_fixed(self.dose_mcg_per_min, 2),
            to_fixed(self.ml_per_min, 4)
        )
    }
}

pub fn calc_infusion(
    weight_kg: Option<f64>,
    bag_mg: Option<f64>,
    bag_ml: Option<f64>,
    target_mcg_per_kg_min: Option<f64>,
) -> Result<InfusionResult, CalcError> {
    let (Some(weight_kg), Some(bag_mg), Some(bag_ml), Some(target)) = (
        positive(weight_kg),
        positive(bag_mg),
        positive(bag_ml),
        positive(target_mcg_per_kg_min),
    ) else {
        return Err(CalcError::InvalidInfusionInput);
    };

    let concentration_mcg_per_ml = bag_mg * 1000.0 / bag_ml;
    let dose_mcg_per_min = target * weight_kg;
    let ml_per_min = dose_mcg_per_min / concentration_mcg_per_ml;

    Ok(InfusionResult {
        concentration_mcg_per_ml,
        dose_mcg_per_min,
        ml_per_min,
        ml_per_hr: ml_per_min * 60.0,
    })
}
