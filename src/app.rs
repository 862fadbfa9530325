use std::time::Duration;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{info, warn};

use crate::calc::{calc_dose, calc_infusion, parse_number, CalcError, DoseResult, InfusionResult};
use crate::config::AppConfig;
use crate::error::describe_js;
use crate::labels;
use crate::platform;
use crate::route::{Route, Tab};
use crate::screen::{self, CopyFeedback, CopyStatus, DetailView, ItemView, ListView, Screen};
use crate::state::{Action, Command, DataState, ViewState};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let state = RwSignal::new(ViewState::new(
        Route::parse(&platform::current_fragment()),
        config.highlight_by_default,
    ));
    let data = RwSignal::new(DataState::Loading);
    provide_context(config.clone());

    let dispatch = Callback::new(move |action: Action| {
        let effect = state.try_update(|s| s.apply(action)).flatten();
        if let Some(Command::Navigate(route)) = effect {
            platform::navigate(&route);
        }
    });

    let _hash_listener = window_event_listener(ev::hashchange, move |_| {
        dispatch.run(Action::FragmentChanged(platform::current_fragment()));
    });

    let data_url = config.data_url.clone();
    Effect::new(move |_| {
        let url = data_url.clone();
        spawn_local(async move {
            match platform::load_catalog(&url).await {
                Ok(catalog) => {
                    if catalog.is_empty() {
                        warn!(%url, "catalog loaded but has no protocols");
                    } else {
                        info!(count = catalog.len(), %url, "catalog loaded");
                    }
                    data.set(DataState::Ready(catalog));
                }
                Err(err) => {
                    warn!(%err, %url, "catalog load failed");
                    data.set(DataState::Failed(err.to_string()));
                }
            }
        });
    });

    let view_url = config.data_url.clone();
    let current = Memo::new(move |_| {
        state.with(|s| data.with(|d| screen::build(s, d, &view_url)))
    });
    let tab = Memo::new(move |_| state.with(ViewState::tab));

    let tab_class = move |which: Tab| {
        if tab.get() == which {
            "tab is-active"
        } else {
            "tab"
        }
    };
    let tab_selected = move |which: Tab| if tab.get() == which { "true" } else { "false" };

    view! {
        <header class="topbar">
            <div class="tabs" role="tablist">
                <button
                    class=move || tab_class(Tab::Protocols)
                    role="tab"
                    aria-selected=move || tab_selected(Tab::Protocols)
                    on:click=move |_| dispatch.run(Action::SelectTab(Tab::Protocols))
                >
                    {labels::TAB_PROTOCOLS}
                </button>
                <button
                    class=move || tab_class(Tab::Tools)
                    role="tab"
                    aria-selected=move || tab_selected(Tab::Tools)
                    on:click=move |_| dispatch.run(Action::SelectTab(Tab::Tools))
                >
                    {labels::TAB_TOOLS}
                </button>
            </div>
            <input
                class="search"
                type="search"
                placeholder=labels::SEARCH_PLACEHOLDER
                prop:value=move || state.with(|s| s.query.clone())
                on:input=move |ev| dispatch.run(Action::SearchInput(event_target_value(&ev)))
            />
        </header>
        <main class="app">
            {move || render_screen(current.get(), dispatch)}
        </main>
    }
}

fn render_screen(screen: Screen, dispatch: Callback<Action>) -> AnyView {
    match screen {
        Screen::Loading => view! { <div class="card muted">{labels::LOADING}</div> }.into_any(),
        Screen::LoadError { message, hint } => {
            view! { <LoadErrorPanel message=message hint=hint /> }.into_any()
        }
        Screen::List(list) => view! { <ProtocolList list=list dispatch=dispatch /> }.into_any(),
        Screen::Detail(detail) => {
            view! { <ProtocolDetail detail=detail dispatch=dispatch /> }.into_any()
        }
        Screen::NotFound => view! { <NotFound dispatch=dispatch /> }.into_any(),
        Screen::Tools => view! { <ToolsPanel /> }.into_any(),
    }
}

#[component]
fn LoadErrorPanel(message: String, hint: String) -> impl IntoView {
    view! {
        <div class="card protocol">
            <div class="protocol__title">{labels::LOAD_ERROR_TITLE}</div>
            <div class="protocol__meta">{message}</div>
            <div class="protocol__content">{hint}</div>
        </div>
    }
}

#[component]
fn ProtocolList(list: ListView, dispatch: Callback<Action>) -> impl IntoView {
    let searching = list.searching;
    view! {
        <div class="section">
            <div class="section__header">
                <div class="section__title">{labels::ALL_PROTOCOLS}</div>
                <div class="pill">{format!("{} {}", list.total, labels::RESULTS_SUFFIX)}</div>
            </div>
        </div>
        {list
            .groups
            .into_iter()
            .map(move |group| {
                let count = group.items.len();
                view! {
                    <div class="section">
                        <div class="section__header">
                            <div class="section__title">{group.label}</div>
                            <div class="pill">{count}</div>
                        </div>
                        <div class="list">
                            {group
                                .items
                                .into_iter()
                                .map(move |item| {
                                    view! {
                                        <ProtocolItem item=item searching=searching dispatch=dispatch />
                                    }
                                })
                                .collect::<Vec<_>>()}
                        </div>
                    </div>
                }
            })
            .collect::<Vec<_>>()}
    }
}

#[component]
fn ProtocolItem(item: ItemView, searching: bool, dispatch: Callback<Action>) -> impl IntoView {
    let route = item.route();
    let key_route = route.clone();
    view! {
        <div
            class="item"
            role="button"
            tabindex="0"
            data-protocol-id=item.id.clone()
            on:click=move |_| dispatch.run(Action::Open(route.clone()))
            on:keydown=move |ev: web_sys::KeyboardEvent| {
                let key = ev.key();
                if key == "Enter" || key == " " {
                    ev.prevent_default();
                    dispatch.run(Action::Open(key_route.clone()));
                }
            }
        >
            <div class="item__title">{item.title}</div>
            <div class="item__meta">
                <span>
                    <b>{labels::PAGE}</b>
                    " "
                    {item.pages}
                </span>
                {searching.then(|| view! { <span class="pill">{labels::SEARCH_PILL}</span> })}
            </div>
        </div>
    }
}

#[component]
fn ProtocolDetail(detail: DetailView, dispatch: Callback<Action>) -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let revert_after = Duration::from_millis(config.copy_feedback_ms);
    let status = RwSignal::new(CopyStatus::default());
    let pending = StoredValue::new(None::<TimeoutHandle>);

    let raw = detail.raw_content.clone();
    let on_copy = move |_| {
        let text = raw.clone();
        spawn_local(async move {
            let outcome = match platform::copy_text(&text).await {
                Ok(()) => CopyFeedback::Copied,
                Err(err) => {
                    warn!(%err, "copy to clipboard failed");
                    CopyFeedback::Failed
                }
            };
            // The view may be gone by now; a disposed signal just drops the write.
            let Some(ticket) = status.try_update(|s| s.show(outcome)) else {
                return;
            };
            let revert = move || {
                let _ = status.try_update(|s| s.expire(ticket));
            };
            match set_timeout_with_handle(revert, revert_after) {
                Ok(handle) => {
                    let previous = pending.try_update_value(|slot| slot.replace(handle));
                    if let Some(Some(previous)) = previous {
                        previous.clear();
                    }
                }
                Err(err) => {
                    warn!(err = %describe_js(&err), "could not schedule copy label reset");
                }
            }
        });
    };

    let highlight_class = if detail.highlight {
        "btn btn--primary"
    } else {
        "btn"
    };
    let highlight_label = detail.highlight_label();

    view! {
        <div class="card protocol">
            <div class="toolbar">
                <button class="btn btn--primary" on:click=move |_| dispatch.run(Action::Open(Route::Home))>
                    {labels::BACK}
                </button>
                <button class="btn" on:click=on_copy>
                    {move || status.get().label()}
                </button>
                <button class="btn" on:click=|_| platform::print()>
                    {labels::PRINT}
                </button>
                <button class=highlight_class on:click=move |_| dispatch.run(Action::ToggleHighlight)>
                    {highlight_label}
                </button>
            </div>

            <div class="protocol__title">{detail.title}</div>
            <div class="protocol__meta">
                <span>
                    <b>{labels::CATEGORY}</b>
                    " "
                    {detail.category}
                </span>
                <span>
                    <b>{labels::PAGE}</b>
                    " "
                    {detail.pages}
                </span>
                <span class="pill">{detail.id}</span>
            </div>

            <div class="protocol__content" inner_html=detail.content_html></div>
        </div>
    }
}

#[component]
fn NotFound(dispatch: Callback<Action>) -> impl IntoView {
    view! {
        <div class="card protocol">
            <div class="protocol__title">{labels::NOT_FOUND_TITLE}</div>
            <div class="protocol__meta">{labels::NOT_FOUND_BODY}</div>
            <div class="toolbar">
                <button class="btn btn--primary" on:click=move |_| dispatch.run(Action::Open(Route::Home))>
                    {labels::BACK}
                </button>
            </div>
        </div>
    }
}

#[component]
fn ToolsPanel() -> impl IntoView {
    view! {
        <div class="card protocol">
            <div class="protocol__title">{labels::TOOLS_TITLE}</div>
            <div class="protocol__meta">{labels::TOOLS_DISCLAIMER}</div>
            <DoseCalculator />
            <InfusionCalculator />
        </div>
    }
}

#[component]
fn Field(
    label: &'static str,
    placeholder: &'static str,
    value: RwSignal<String>,
    #[prop(optional)] numeric: bool,
) -> impl IntoView {
    let input_mode = if numeric { "decimal" } else { "text" };
    view! {
        <div class="field">
            <label>{label}</label>
            <input
                inputmode=input_mode
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
fn DoseCalculator() -> impl IntoView {
    let weight = RwSignal::new(String::new());
    let dose = RwSignal::new(String::new());
    let max = RwSignal::new(String::new());
    let frequency = RwSignal::new(String::new());
    let outcome = RwSignal::new(None::<Result<DoseResult, CalcError>>);

    let compute = move |_| {
        let result = calc_dose(
            parse_number(&weight.get_untracked()),
            parse_number(&dose.get_untracked()),
            parse_number(&max.get_untracked()),
            &frequency.get_untracked(),
        );
        outcome.set(Some(result));
    };
    let clear = move |_| {
        for field in [weight, dose, max, frequency] {
            field.set(String::new());
        }
        outcome.set(None);
    };

    view! {
        <div class="section">
            <div class="section__header">
                <div class="section__title">{labels::DOSE_TITLE}</div>
                <div class="pill">"Dose"</div>
            </div>
            <div class="grid">
                <Field label=labels::WEIGHT_KG placeholder="לדוגמה: 12.5" value=weight numeric=true />
                <Field label=labels::DOSE_MG_KG placeholder="לדוגמה: 50" value=dose numeric=true />
                <Field label=labels::MAX_MG placeholder="לדוגמה: 2000" value=max numeric=true />
                <Field label=labels::FREQUENCY placeholder="לדוגמה: פעם ביום / מחולק ל-3" value=frequency />
            </div>
            <div class="toolbar">
                <button class="btn btn--primary" on:click=compute>{labels::COMPUTE}</button>
                <button class="btn btn--danger" on:click=clear>{labels::CLEAR}</button>
            </div>
            <div class="result">{move || dose_outcome(outcome.get())}</div>
        </div>
    }
}

fn dose_outcome(outcome: Option<Result<DoseResult, CalcError>>) -> AnyView {
    match outcome {
        None => view! { <span>{labels::DOSE_PROMPT}</span> }.into_any(),
        Some(Err(err)) => view! { <span>{err.message()}</span> }.into_any(),
        Some(Ok(result)) => {
            let explanation = format!("{}: {}", labels::CALCULATION, result.explanation());
            let frequency = result
                .frequency
                .clone()
                .map(|f| format!("{}: {}", labels::FREQUENCY_LINE, f));
            view! {
                <div>
                    <b>{labels::RESULT}</b>
                    {format!(": {} mg", result.dose_display())}
                </div>
                <div class="result__detail">
                    <div>{explanation}</div>
                    {frequency.map(|line| view! { <div>{line}</div> })}
                </div>
            }
            .into_any()
        }
    }
}

#[component]
fn InfusionCalculator() -> impl IntoView {
    let weight = RwSignal::new(String::new());
    let bag_mg = RwSignal::new(String::new());
    let bag_ml = RwSignal::new(String::new());
    let target = RwSignal::new(String::new());
    let outcome = RwSignal::new(None::<Result<InfusionResult, CalcError>>);

    let compute = move |_| {
        let result = calc_infusion(
            parse_number(&weight.get_untracked()),
            parse_number(&bag_mg.get_untracked()),
            parse_number(&bag_ml.get_untracked()),
            parse_number(&target.get_untracked()),
        );
        outcome.set(Some(result));
    };
    let clear = move |_| {
        for field in [weight, bag_mg, bag_ml, target] {
            field.set(String::new());
        }
        outcome.set(None);
    };

    view! {
        <div class="section">
            <div class="section__header">
                <div class="section__title">{labels::INFUSION_TITLE}</div>
                <div class="pill">"Infusion"</div>
            </div>
            <div class="grid">
                <Field label=labels::WEIGHT_KG placeholder="לדוגמה: 18" value=weight numeric=true />
                <Field label=labels::BAG_MG placeholder="לדוגמה: 5" value=bag_mg numeric=true />
                <Field label=labels::BAG_ML placeholder="לדוגמה: 50" value=bag_ml numeric=true />
                <Field label=labels::TARGET_MCG_KG_MIN placeholder="לדוגמה: 0.1" value=target numeric=true />
            </div>
            <div class="toolbar">
                <button class="btn btn--primary" on:click=compute>{labels::COMPUTE}</button>
                <button class="btn btn--danger" on:click=clear>{labels::CLEAR}</button>
            </div>
            <div class="result">{move || infusion_outcome(outcome.get())}</div>
        </div>
    }
}

fn infusion_outcome(outcome: Option<Result<InfusionResult, CalcError>>) -> AnyView {
    match outcome {
        None => view! { <span>{labels::INFUSION_PROMPT}</span> }.into_any(),
        Some(Err(err)) => view! { <span>{err.message()}</span> }.into_any(),
        Some(Ok(result)) => view! {
            <div>
                <b>{labels::RATE}</b>
                {format!(": {}", result.rate_display())}
            </div>
            <div class="result__detail">
                <div>{format!("{}: {}", labels::CONCENTRATION, result.concentration_display())}</div>
                <div>{format!("{}: {}", labels::DOSE_RATE, result.flow_display())}</div>
            </div>
        }
        .into_any(),
    }
}
