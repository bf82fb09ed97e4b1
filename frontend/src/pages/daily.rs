use bornle_engine::{DailyStrategy, GameConfig, PeriodKey, Session, SessionSlot, Variant};
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::pages::board::{Board, PeriodNav};
use crate::types::{fresh_rng, load_people, utc_today};

/// Single-stage puzzle: name anyone born in the day's year, or in a random
/// year of the chosen period.
#[component]
pub fn DailyPage() -> impl IntoView {
    let slot = RwSignal::new(SessionSlot::Loading);

    spawn_local(async move {
        let config = GameConfig::default();
        let loaded = load_people(&config).await.and_then(|people| {
            Session::start(
                people,
                config,
                Variant::Single,
                DailyStrategy::SeededShuffle,
                PeriodKey::Daily,
                utc_today(),
                &mut fresh_rng(),
            )
            .map_err(|e| e.to_string())
        });
        slot.set(match loaded {
            Ok(session) => SessionSlot::Ready(Box::new(session)),
            Err(e) => {
                logging::error!("daily puzzle: {e}");
                SessionSlot::Failed(e)
            }
        });
    });

    view! {
        <div>
            <h2>"Daily"</h2>
            <PeriodNav slot=slot/>
            <Board slot=slot/>
        </div>
    }
}
