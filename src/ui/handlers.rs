//! Web UI handlers

use axum::extract::State;
use axum::response::Html;
use axum::Extension;

use crate::api::server::SharedState;
use crate::auth::token::Claims;
use crate::error::Result;
use crate::gallery::{Case, MediaKind, MediaType};

/// Escape untrusted text for interpolation into HTML
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn year_range(case: &Case) -> String {
    match (case.year_start, case.year_end) {
        (Some(start), Some(end)) => format!("{}-{}", start, end),
        (Some(start), None) => format!("{}+", start),
        _ => String::new(),
    }
}

fn media_tag(case: &Case, kind: MediaKind) -> String {
    match case.media.iter().find(|m| m.kind == kind) {
        Some(item) => match item.media_type {
            MediaType::Image => format!(
                r#"<img src="{}" alt="{}" class="w-full h-48 object-cover rounded">"#,
                escape(&item.url),
                kind
            ),
            MediaType::Video => format!(
                r#"<video src="{}" controls class="w-full h-48 object-cover rounded"></video>"#,
                escape(&item.url)
            ),
        },
        None => r#"<div class="w-full h-48 bg-gray-800 rounded flex items-center justify-center text-gray-500">No media</div>"#.to_string(),
    }
}

/// Public gallery page - published cases only
pub async fn gallery_page(State(state): State<SharedState>) -> Result<Html<String>> {
    let cases = state.gallery.list(false).await?;

    let cards: String = cases
        .iter()
        .map(|case| {
            format!(
                r#"
                <div class="bg-gray-900 border border-gray-800 rounded-lg p-4">
                    <h2 class="text-lg font-semibold">{}</h2>
                    <p class="text-sm text-gray-400 mb-3">{} {} {}</p>
                    <div class="grid grid-cols-2 gap-3">
                        <div><p class="text-xs uppercase text-gray-500 mb-1">Before</p>{}</div>
                        <div><p class="text-xs uppercase text-gray-500 mb-1">After</p>{}</div>
                    </div>
                </div>
                "#,
                escape(&case.title),
                escape(&case.brand),
                escape(&case.model),
                year_range(case),
                media_tag(case, MediaKind::Before),
                media_tag(case, MediaKind::After),
            )
        })
        .collect();

    let html = format!(
        r#"
<!DOCTYPE html>
<html lang="en" class="dark">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Seatgallery</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-950 text-gray-100 min-h-screen">
    <div class="max-w-5xl mx-auto px-4 py-8">
        <div class="flex items-center justify-between mb-8">
            <h1 class="text-2xl font-bold">Seat Cover Case Studies</h1>
            <a href="/admin" class="text-sm text-blue-400 hover:underline">Admin</a>
        </div>
        <div class="grid gap-6 md:grid-cols-2">
            {}
        </div>
    </div>
</body>
</html>
"#,
        if cards.is_empty() {
            r#"<p class="text-gray-500">No case studies published yet.</p>"#.to_string()
        } else {
            cards
        }
    );

    Ok(Html(html))
}

/// Login page
pub async fn login_page() -> Html<String> {
    Html(
        r#"
<!DOCTYPE html>
<html lang="en" class="dark">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sign in - Seatgallery</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-950 text-gray-100 min-h-screen flex items-center justify-center">
    <form id="login-form" class="bg-gray-900 border border-gray-800 rounded-lg p-6 w-80">
        <h1 class="text-xl font-bold mb-4">Sign in</h1>
        <p id="error" class="hidden text-sm text-red-400 mb-3"></p>
        <label class="block text-sm mb-1" for="username">Username</label>
        <input id="username" name="username" autocomplete="username"
               class="w-full mb-3 px-3 py-2 rounded bg-gray-800 border border-gray-700">
        <label class="block text-sm mb-1" for="password">Password</label>
        <input id="password" name="password" type="password" autocomplete="current-password"
               class="w-full mb-4 px-3 py-2 rounded bg-gray-800 border border-gray-700">
        <button type="submit" class="w-full py-2 rounded bg-blue-600 hover:bg-blue-700">Sign in</button>
    </form>
    <script>
        document.getElementById('login-form').addEventListener('submit', async (e) => {
            e.preventDefault();
            const res = await fetch('/api/auth/login', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({
                    username: document.getElementById('username').value,
                    password: document.getElementById('password').value,
                }),
            });
            if (res.ok) {
                window.location = '/admin';
            } else {
                const body = await res.json().catch(() => ({}));
                const err = document.getElementById('error');
                err.textContent = body.error || 'Sign in failed';
                err.classList.remove('hidden');
            }
        });
    </script>
</body>
</html>
"#
        .to_string(),
    )
}

/// Admin dashboard - lists all cases including unpublished
pub async fn admin_dashboard(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> Result<Html<String>> {
    let cases = state.gallery.list(true).await?;

    let rows: String = cases
        .iter()
        .map(|case| {
            let status = if case.published {
                r#"<span class="text-green-400">published</span>"#
            } else {
                r#"<span class="text-yellow-400">draft</span>"#
            };
            format!(
                r#"
                <tr class="border-b border-gray-800">
                    <td class="px-4 py-3">{}</td>
                    <td class="px-4 py-3 text-sm text-gray-400">{} {}</td>
                    <td class="px-4 py-3">{}</td>
                    <td class="px-4 py-3 text-sm">{} items</td>
                </tr>
                "#,
                escape(&case.title),
                escape(&case.brand),
                escape(&case.model),
                status,
                case.media.len(),
            )
        })
        .collect();

    let html = format!(
        r#"
<!DOCTYPE html>
<html lang="en" class="dark">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Admin - Seatgallery</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-950 text-gray-100 min-h-screen">
    <div class="max-w-5xl mx-auto px-4 py-8">
        <div class="flex items-center justify-between mb-8">
            <h1 class="text-2xl font-bold">Admin Dashboard</h1>
            <div class="text-sm text-gray-400">
                Signed in as <span class="text-gray-200">{}</span>
                <button id="logout" class="ml-3 text-blue-400 hover:underline">Sign out</button>
            </div>
        </div>
        <table class="w-full text-left bg-gray-900 border border-gray-800 rounded-lg">
            <thead>
                <tr class="border-b border-gray-700 text-sm uppercase text-gray-500">
                    <th class="px-4 py-3">Title</th>
                    <th class="px-4 py-3">Vehicle</th>
                    <th class="px-4 py-3">Status</th>
                    <th class="px-4 py-3">Media</th>
                </tr>
            </thead>
            <tbody>
                {}
            </tbody>
        </table>
    </div>
    <script>
        document.getElementById('logout').addEventListener('click', async () => {{
            await fetch('/api/auth/logout', {{ method: 'POST' }});
            window.location = '/login';
        }});
    </script>
</body>
</html>
"#,
        escape(&claims.username),
        if rows.is_empty() {
            r#"<tr><td class="px-4 py-3 text-gray-500" colspan="4">No cases yet.</td></tr>"#
                .to_string()
        } else {
            rows
        }
    );

    Ok(Html(html))
}
