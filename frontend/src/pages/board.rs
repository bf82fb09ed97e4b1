use bornle_engine::{PeriodKey, PersonRecord, SessionSlot, Stage, Turn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos::web_sys;

use crate::types::{copy_to_clipboard, fetch_summary, fresh_rng, utc_today, page_url};

/// Guess input, autocomplete, history and the end-of-game panel for
/// whichever puzzle `slot` holds.
#[component]
pub fn Board(slot: RwSignal<SessionSlot>) -> impl IntoView {
    let input = RwSignal::new(String::new());
    let notice: RwSignal<Option<String>> = RwSignal::new(None);

    let submit = move |raw: String| {
        let mut rng = fresh_rng();
        let mut result = None;
        slot.update(|s| result = Some(s.guess(&raw, &mut rng)));
        match result {
            Some(Ok(Turn::Identified { person, .. })) => {
                notice.set(Some(format!("✅ {} — now the year.", person.name)));
                input.set(String::new());
            }
            Some(Ok(_)) => {
                notice.set(None);
                input.set(String::new());
            }
            // Rejected input stays in the box
            Some(Err(e)) => notice.set(Some(e.to_string())),
            None => {}
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit(input.get_untracked());
    };

    let suggestions = move || {
        let query = input.get();
        slot.with(|s| {
            let Some(session) = s.session() else {
                return Vec::new();
            };
            if session.puzzle().stage() == Stage::Year {
                return Vec::new();
            }
            session.suggest(&query).into_iter().map(|p| p.name.clone()).collect::<Vec<_>>()
        })
    };

    view! {
        <div class="board">
            {move || slot.with(|s| match s {
                SessionSlot::Loading => view! { <p class="loading">"Loading people…"</p> }.into_any(),
                SessionSlot::Failed(e) => view! { <p class="error">{format!("Could not load data: {e}")}</p> }.into_any(),
                SessionSlot::Ready(session) => {
                    let p = session.puzzle();
                    view! {
                        <p class="prompt">
                            {p.prompt()}
                            {(!p.is_over()).then(|| view! {
                                <span class="remaining">{format!(" ({} left)", p.remaining())}</span>
                            })}
                        </p>
                    }.into_any()
                }
            })}

            <form on:submit=on_submit>
                <div class="search-row">
                    <input
                        type="text"
                        placeholder="Type a name or a year"
                        prop:value=input
                        prop:disabled=move || slot.with(|s| s.session().is_some_and(|x| x.puzzle().is_over()))
                        on:input=move |ev| input.set(event_target_value(&ev))
                    />
                    <button type="submit">"Guess"</button>
                </div>
            </form>

            <ul class="suggestions">
                {move || suggestions().into_iter().map(|name| {
                    let pick = name.clone();
                    view! {
                        <li on:click=move |_| submit(pick.clone())>{name}</li>
                    }
                }).collect_view()}
            </ul>

            {move || notice.get().map(|n| view! { <p class="notice">{n}</p> })}

            <ol class="history">
                {move || slot.with(|s| s.session().map(|session| {
                    session.puzzle().history().iter().map(|entry| {
                        let class = if entry.is_win() { "hit" } else { "miss" };
                        view! { <li class=class>{entry.to_string()}</li> }
                    }).collect_view()
                }))}
            </ol>

            {move || slot.with(|s| {
                let session = s.session()?;
                let p = session.puzzle();
                if !p.is_over() {
                    return None;
                }
                let share = session.share_text(page_url().as_deref());
                let reveal = p.revealed().cloned();
                Some(view! {
                    <ShareBox text=share/>
                    {reveal.map(|person| view! { <Reveal person=person/> })}
                })
            })}
        </div>
    }
}

/// One button per period with data; picking one starts a fresh puzzle.
#[component]
pub fn PeriodNav(slot: RwSignal<SessionSlot>) -> impl IntoView {
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let choose = move |period: PeriodKey| {
        let mut outcome = Ok(());
        slot.update(|s| {
            if let Some(session) = s.session_mut() {
                outcome = session.reset(period, utc_today(), &mut fresh_rng());
            }
        });
        error.set(outcome.err().map(|e| e.to_string()));
    };

    let periods = move || slot.with(|s| s.session().map(|x| (x.periods(), x.period())));

    view! {
        <nav class="periods">
            {move || periods().map(|(list, active)| {
                list.into_iter().map(|(period, years)| {
                    let class = if period == active { "period active" } else { "period" };
                    view! {
                        <button type="button" class=class title=format!("{years} years")
                            on:click=move |_| choose(period)>
                            {period.label()}
                        </button>
                    }
                }).collect_view()
            })}
        </nav>
        {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
    }
}

#[component]
fn ShareBox(text: String) -> impl IntoView {
    let copied: RwSignal<Option<Result<(), String>>> = RwSignal::new(None);
    let to_copy = text.clone();
    let on_copy = move |_| {
        let text = to_copy.clone();
        spawn_local(async move {
            copied.set(Some(copy_to_clipboard(text).await));
        });
    };

    view! {
        <div class="card share">
            <pre>{text}</pre>
            <button type="button" on:click=on_copy>"Copy result"</button>
            {move || match copied.get() {
                None => view! { <span/> }.into_any(),
                Some(Ok(())) => view! { <span class="notice">"Copied!"</span> }.into_any(),
                Some(Err(e)) => view! { <span class="error">{e}</span> }.into_any(),
            }}
        </div>
    }
}

/// Portrait and bio of the revealed person. Lookup failures show nothing.
#[component]
fn Reveal(person: PersonRecord) -> impl IntoView {
    let summary = RwSignal::new(None);
    let lookup = person.clone();
    spawn_local(async move {
        summary.set(fetch_summary(lookup).await);
    });

    let link = person.wikiurl.clone();
    view! {
        <div class="card reveal">
            <h3>{format!("{} ({})", person.name, person.birthyear)}</h3>
            {move || summary.get().map(|s| view! {
                {s.portrait().map(|src| view! { <img src=src.to_string() alt="portrait"/> })}
                {s.bio().map(|bio| view! { <p>{bio.to_string()}</p> })}
            })}
            {link.map(|href| view! { <a href=href target="_blank">"Wikipedia"</a> })}
        </div>
    }
}
