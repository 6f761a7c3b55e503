//! Server-rendered pages. Every interpolated value goes through `escape`.

use std::fmt::Write;

use axum::response::Html;

use crate::{
    auth::AuthUser,
    models::{Category, Statistics, User, VocabularyEntry},
};

const NOT_AVAILABLE: &str = "N/A";

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; background-color: #f4f4f4; margin: 0; padding: 20px; }
.container { background: white; padding: 30px; border-radius: 10px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); max-width: 600px; margin: 0 auto; }
h1 { text-align: center; color: #333; }
ul { list-style-type: none; padding: 0; }
li { background: #f9f9f9; margin: 10px 0; padding: 15px; border-radius: 5px; border-left: 5px solid #4CAF50; }
form { display: flex; flex-direction: column; }
label { margin-bottom: 5px; font-weight: bold; }
input[type="text"], input[type="email"], input[type="password"] { padding: 10px; margin-bottom: 15px; border: 1px solid #ddd; border-radius: 5px; }
input[type="submit"] { background: #4CAF50; color: white; padding: 10px; border: none; border-radius: 5px; cursor: pointer; }
a { color: #4CAF50; text-decoration: none; font-weight: bold; }
.nav a { margin-right: 10px; }
.danger { color: red; }
"#;

/// Escapes text for use in HTML element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_na(value: Option<&str>) -> String {
    escape(value.unwrap_or(NOT_AVAILABLE))
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n<div class=\"container\">\n<h1>{title}</h1>\n{body}\n</div>\n</body>\n</html>\n",
        title = escape(title),
        style = STYLE,
    ))
}

fn nav() -> &'static str {
    r#"<p class="nav"><a href="/">Vocabulary</a><a href="/add">Add New Word</a><a href="/categories">Categories</a><a href="/statistics">Statistics</a><a href="/users">Users</a><a href="/logout">Logout</a></p>"#
}

pub fn vocabulary_list(user: &AuthUser, words: &[VocabularyEntry]) -> Html<String> {
    let mut body = format!("<p>Logged in as {}</p>\n{}\n<ul>\n", escape(&user.name), nav());
    for entry in words {
        let id = entry.id.to_hex();
        let _ = write!(
            body,
            "<li><strong>Word:</strong> {word}<br>\n\
             <strong>Translation:</strong> {translation}<br>\n\
             <strong>Part of Speech:</strong> {pos}<br>\n\
             <strong>Examples:</strong> {examples}<br>\n\
             <strong>Categories:</strong> {categories}<br>\n\
             <a href=\"/edit/{id}\">Edit</a> <a class=\"danger\" href=\"/delete/{id}\">Delete</a></li>\n",
            word = escape(&entry.word),
            translation = or_na(entry.translation.as_deref()),
            pos = or_na(entry.part_of_speech.as_deref()),
            examples = escape(&entry.examples.join(", ")),
            categories = escape(&entry.categories.join(", ")),
        );
    }
    body.push_str("</ul>");
    page("Vocabulary Words", &body)
}

/// Add form when `entry` is `None`, otherwise the edit form pre-populated from it.
pub fn word_form(entry: Option<&VocabularyEntry>) -> Html<String> {
    let (title, submit) = match entry {
        Some(_) => ("Edit Word", "Update"),
        None => ("Add New Word", "Add"),
    };
    let value = |v: Option<&str>| escape(v.unwrap_or(""));
    let word = value(entry.map(|e| e.word.as_str()));
    let translation = value(entry.and_then(|e| e.translation.as_deref()));
    let pos = value(entry.and_then(|e| e.part_of_speech.as_deref()));
    let examples = escape(&entry.map(|e| e.examples.join(", ")).unwrap_or_default());
    let categories = escape(&entry.map(|e| e.categories.join(", ")).unwrap_or_default());

    let body = format!(
        "{nav}\n<form method=\"post\">\n\
         <label>Word: <input type=\"text\" name=\"word\" value=\"{word}\" required></label>\n\
         <label>Translation: <input type=\"text\" name=\"translation\" value=\"{translation}\" required></label>\n\
         <label>Part of Speech: <input type=\"text\" name=\"partOfSpeech\" value=\"{pos}\"></label>\n\
         <label>Examples (comma separated): <input type=\"text\" name=\"examples\" value=\"{examples}\"></label>\n\
         <label>Categories (comma separated): <input type=\"text\" name=\"categories\" value=\"{categories}\"></label>\n\
         <input type=\"submit\" value=\"{submit}\">\n</form>",
        nav = nav(),
    );
    page(title, &body)
}

pub fn categories(categories: &[Category]) -> Html<String> {
    let mut body = format!("{}\n<ul>\n", nav());
    for category in categories {
        let _ = writeln!(
            body,
            "<li>{} - {}</li>",
            or_na(category.name.as_deref()),
            or_na(category.description.as_deref()),
        );
    }
    body.push_str("</ul>");
    page("Categories", &body)
}

pub fn statistics(stats: &Statistics) -> Html<String> {
    let body = format!(
        "{nav}\n<ul>\n<li>Total words: {}</li>\n<li>Total categories: {}</li>\n<li>Total users: {}</li>\n</ul>",
        stats.vocabulary,
        stats.categories,
        stats.users,
        nav = nav(),
    );
    page("Statistics", &body)
}

/// Account listing. Password hashes are never rendered.
pub fn users(users: &[User]) -> Html<String> {
    let mut body = format!("{}\n<ul>\n", nav());
    for user in users {
        let _ = writeln!(body, "<li>{} - {}</li>", escape(&user.name), escape(&user.email));
    }
    body.push_str("</ul>");
    page("Users", &body)
}

pub fn register_form() -> Html<String> {
    let body = "<form method=\"post\">\n\
        <label>Name: <input type=\"text\" name=\"name\" required></label>\n\
        <label>Email: <input type=\"email\" name=\"email\" required></label>\n\
        <label>Password: <input type=\"password\" name=\"password\" required></label>\n\
        <input type=\"submit\" value=\"Register\">\n</form>\n\
        <p>Already registered? <a href=\"/login\">Log in</a></p>";
    page("Register", body)
}

pub fn login_form(next: Option<&str>) -> Html<String> {
    let hidden = next
        .map(|n| format!("<input type=\"hidden\" name=\"next\" value=\"{}\">\n", escape(n)))
        .unwrap_or_default();
    let body = format!(
        "<form method=\"post\">\n{hidden}\
         <label>Email: <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password: <input type=\"password\" name=\"password\" required></label>\n\
         <input type=\"submit\" value=\"Login\">\n</form>\n\
         <p>No account? <a href=\"/register\">Register</a></p>"
    );
    page("Login", &body)
}
