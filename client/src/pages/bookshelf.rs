//! Bookshelf page. Protected like every other reader page; the shelf itself
//! is rendered empty here.

use leptos::prelude::*;

#[component]
pub fn BookshelfPage() -> impl IntoView {
    view! {
        <div class="bookshelf-page">
            <h1>"My bookshelf"</h1>
            <p class="bookshelf-page__empty">"Nothing on your shelf yet."</p>
            <a href="/">"Back home"</a>
        </div>
    }
}
