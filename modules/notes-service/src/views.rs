//! HTML pages served by the notes service.

use std::fmt::Write;

use notes_types::Note;

use crate::error::NotesResult;

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> NotesResult<String> {
    let mut html = String::new();
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
{}
</body>
</html>"#,
        escape(title),
        body
    )?;
    Ok(html)
}

pub fn index() -> NotesResult<String> {
    layout(
        "Notes",
        r#"<h1>Notes</h1>
<p class="meta">Keep a personal list of named notes.</p>
<nav><a href="/login">Log in</a> <a href="/register">Register</a></nav>"#,
    )
}

fn credentials_page(title: &str, action: &str, button: &str, alt: &str) -> NotesResult<String> {
    let mut body = String::new();
    write!(
        body,
        r#"<h1>{title}</h1>
<form method="post" action="{action}">
  <label>Username <input type="text" name="username" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">{button}</button>
</form>
<p class="meta">{alt}</p>"#
    )?;
    layout(title, &body)
}

pub fn register() -> NotesResult<String> {
    credentials_page(
        "Register",
        "/register",
        "Create account",
        r#"Already registered? <a href="/login">Log in</a>"#,
    )
}

pub fn login() -> NotesResult<String> {
    credentials_page(
        "Log in",
        "/login",
        "Log in",
        r#"No account yet? <a href="/register">Register</a>"#,
    )
}

pub fn notes(username: &str, notes: &[Note]) -> NotesResult<String> {
    let mut rows = String::new();
    for note in notes {
        let link = urlencoding::encode(&note.name);
        write!(
            rows,
            "<tr><td>{}</td><td class=\"content\">{}</td><td><a href=\"/edit?name={}\">Edit</a> <a href=\"/delete?name={}\">Delete</a></td></tr>\n",
            escape(&note.name),
            escape(&note.content),
            link,
            link,
        )?;
    }
    if rows.is_empty() {
        rows.push_str("<tr><td colspan=\"3\">No notes yet.</td></tr>");
    }

    let mut body = String::new();
    write!(
        body,
        r#"<h1>Notes</h1>
<p class="meta">Logged in as {user}</p>
<form method="post" action="/logout"><button type="submit">Log out</button></form>
<table>
<thead><tr><th>Name</th><th>Content</th><th></th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<h2>New note</h2>
<form method="post" action="/notes">
  <label>Name <input type="text" name="name" required></label>
  <label>Content <textarea name="content"></textarea></label>
  <button type="submit">Add</button>
</form>"#,
        user = escape(username),
        rows = rows,
    )?;
    layout("Notes", &body)
}

/// Edit form. A missing note renders with empty fields.
pub fn edit_note(note: &Note) -> NotesResult<String> {
    let name = escape(&note.name);
    let mut body = String::new();
    write!(
        body,
        r#"<h1>Edit note</h1>
<form method="post" action="/edit">
  <input type="hidden" name="old_name" value="{name}">
  <label>Name <input type="text" name="name" value="{name}" required></label>
  <label>Content <textarea name="content">{content}</textarea></label>
  <button type="submit">Save</button>
</form>
<p><a href="/notes">Back to notes</a></p>"#,
        name = name,
        content = escape(&note.content),
    )?;
    layout("Edit note", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_note_links_are_percent_encoded() {
        let page = notes(
            "alice",
            &[Note::new("todo", ""), Note::new("a b&c", ""), Note::new("é", "")],
        )
        .unwrap();
        assert!(page.contains("/edit?name=todo\""));
        assert!(page.contains("/delete?name=a%20b%26c\""));
        assert!(page.contains("/edit?name=%C3%A9\""));
    }

    #[test]
    fn test_notes_page_lists_escaped_notes() {
        let page = notes("alice", &[Note::new("<x>", "a & b"), Note::new("two words", "")]).unwrap();
        assert!(page.contains("Logged in as alice"));
        assert!(page.contains("&lt;x&gt;"));
        assert!(page.contains("a &amp; b"));
        assert!(page.contains("/edit?name=two%20words"));
        assert!(!page.contains("<x>"));
    }

    #[test]
    fn test_empty_notes_page() {
        let page = notes("alice", &[]).unwrap();
        assert!(page.contains("No notes yet."));
    }

    #[test]
    fn test_edit_page_prefills_fields() {
        let page = edit_note(&Note::new("todo", "milk")).unwrap();
        assert!(page.contains(r#"name="old_name" value="todo""#));
        assert!(page.contains(">milk</textarea>"));
    }

    #[test]
    fn test_credential_pages() {
        assert!(register().unwrap().contains(r#"action="/register""#));
        assert!(login().unwrap().contains(r#"action="/login""#));
        assert!(index().unwrap().contains(r#"href="/login""#));
    }
}
