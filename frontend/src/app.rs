use leptos::prelude::*;
use leptos_router::{
    components::{A, Route, Router, Routes},
    path,
};

use crate::pages::{daily::DailyPage, staged::StagedPage};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <div id="app">
                <header>
                    <h1>"Bornle"</h1>
                    <nav>
                        <A href="/">"Daily"</A>
                        <A href="/periods">"Periods"</A>
                    </nav>
                </header>
                <main>
                    <Routes fallback=|| {
                        view! { <p class="error">"Page not found"</p> }
                    }>
                        <Route path=path!("/") view=DailyPage/>
                        <Route path=path!("/periods") view=StagedPage/>
                    </Routes>
                </main>
                <footer>
                    <p>"Guess someone born in the year. People data from a shared sheet; bios from Wikipedia."</p>
                </footer>
            </div>
        </Router>
    }
}
