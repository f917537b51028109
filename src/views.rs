//! Server-rendered HTML pages.
//!
//! Rendering is deliberately plain: each page is assembled from the
//! [`UserContext`] the aggregator produced, with every interpolated value
//! escaped. Layout polish is left to whoever fronts this with real templates.

use crate::services::{MemberInfo, UserContext};
use html_escape::encode_text;

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - Clubhouse</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        encode_text(title),
        body
    )
}

fn flash_block(flash: Option<&str>) -> String {
    flash.map_or_else(String::new, |message| {
        format!("<p class=\"flash\">{}</p>\n", encode_text(message))
    })
}

fn nav(user: Option<&MemberInfo>) -> String {
    let mut html = String::from("<nav>\n<a href=\"/\">Home</a>\n");

    if let Some(member) = user {
        html.push_str(&format!(
            "<span>Logged in as {}</span>\n",
            encode_text(&member.display_name())
        ));
        html.push_str("<a href=\"/new-message\">New message</a>\n");
        if !member.is_admin {
            html.push_str("<a href=\"/login-success/admin\">Admin access</a>\n");
        }
        html.push_str("<a href=\"/logout\">Log out</a>\n");
    } else {
        html.push_str("<a href=\"/sign-up\">Sign up</a>\n");
        html.push_str("<a href=\"/join\">Join the club</a>\n");
        html.push_str("<a href=\"/login\">Log in</a>\n");
    }

    html.push_str("</nav>\n");
    html
}

/// The homepage: message board plus state-dependent navigation.
#[must_use]
pub fn homepage(ctx: &UserContext, user: Option<&MemberInfo>, flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Clubhouse</h1>\n");
    body.push_str(&nav(user));
    body.push_str(&flash_block(flash));

    body.push_str("<section id=\"messages\">\n<h2>Messages</h2>\n");
    if ctx.messages.is_empty() {
        body.push_str("<p>No messages yet.</p>\n");
    }
    for message in &ctx.messages {
        body.push_str("<article>\n");
        body.push_str(&format!("<h3>{}</h3>\n", encode_text(&message.title)));
        body.push_str(&format!(
            "<p class=\"meta\">{} at {}</p>\n",
            encode_text(&message.author_name()),
            encode_text(&message.created_at)
        ));
        body.push_str(&format!("<p>{}</p>\n", encode_text(&message.body)));
        if ctx.is_admin {
            body.push_str(&format!(
                "<form method=\"post\" action=\"/message/{}/delete\">\
                 <button type=\"submit\">Delete</button></form>\n",
                message.id
            ));
        }
        body.push_str("</article>\n");
    }
    body.push_str("</section>\n");

    page("Home", &body)
}

#[must_use]
pub fn signup_form(flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Sign up</h1>\n");
    body.push_str(&flash_block(flash));
    body.push_str(
        "<form method=\"post\" action=\"/sign-up\">\n\
         <label>First name <input type=\"text\" name=\"firstName\" required></label>\n\
         <label>Last name <input type=\"text\" name=\"lastName\" required></label>\n\
         <label>Email <input type=\"email\" name=\"username\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <label>Confirm password <input type=\"password\" name=\"passwordConfirmation\" required></label>\n\
         <button type=\"submit\">Sign up</button>\n\
         </form>\n\
         <p><a href=\"/\">Back</a></p>\n",
    );
    page("Sign up", &body)
}

#[must_use]
pub fn join_form(flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Join the club</h1>\n");
    body.push_str(&flash_block(flash));
    body.push_str(
        "<form method=\"post\" action=\"/join\">\n\
         <label>Email <input type=\"email\" name=\"username\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <label>Secret passcode <input type=\"password\" name=\"secretPasscode\" required></label>\n\
         <button type=\"submit\">Join</button>\n\
         </form>\n\
         <p><a href=\"/\">Back</a></p>\n",
    );
    page("Join", &body)
}

#[must_use]
pub fn login_form(flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Log in</h1>\n");
    body.push_str(&flash_block(flash));
    body.push_str(
        "<form method=\"post\" action=\"/login\">\n\
         <label>Email <input type=\"email\" name=\"username\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n\
         <p><a href=\"/\">Back</a></p>\n",
    );
    page("Log in", &body)
}

#[must_use]
pub fn admin_form(flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Admin access</h1>\n");
    body.push_str(&flash_block(flash));
    body.push_str(
        "<form method=\"post\" action=\"/login-success/admin\">\n\
         <label>Admin passcode <input type=\"password\" name=\"adminPasscode\" required></label>\n\
         <button type=\"submit\">Request admin access</button>\n\
         </form>\n\
         <p><a href=\"/\">Back</a></p>\n",
    );
    page("Admin access", &body)
}

#[must_use]
pub fn new_message_form(flash: Option<&str>) -> String {
    let mut body = String::from("<h1>New message</h1>\n");
    body.push_str(&flash_block(flash));
    body.push_str(
        "<form method=\"post\" action=\"/new-message\">\n\
         <label>Title <input type=\"text\" name=\"title\" required></label>\n\
         <label>Text <textarea name=\"text\" required></textarea></label>\n\
         <button type=\"submit\">Post</button>\n\
         </form>\n\
         <p><a href=\"/\">Back</a></p>\n",
    );
    page("New message", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MessageRow;

    fn sample_context(is_admin: bool) -> UserContext {
        UserContext {
            messages: vec![MessageRow {
                id: 7,
                title: "<b>hello</b>".to_string(),
                body: "first & foremost".to_string(),
                created_at: "2026-03-01T12:00:00+00:00".to_string(),
                author_first_name: "Jane".to_string(),
                author_last_name: "Doe".to_string(),
            }],
            signed_up: true,
            has_joined: true,
            is_admin,
        }
    }

    #[test]
    fn test_homepage_escapes_user_content() {
        let html = homepage(&sample_context(false), None, None);
        assert!(html.contains("&lt;b&gt;hello&lt;/b&gt;"));
        assert!(html.contains("first &amp; foremost"));
        assert!(!html.contains("<b>hello</b>"));
    }

    #[test]
    fn test_homepage_delete_button_is_admin_only() {
        let html = homepage(&sample_context(false), None, None);
        assert!(!html.contains("/message/7/delete"));

        let html = homepage(&sample_context(true), None, None);
        assert!(html.contains("/message/7/delete"));
    }

    #[test]
    fn test_nav_reflects_login_state() {
        let html = homepage(&sample_context(false), None, None);
        assert!(html.contains("/sign-up"));
        assert!(!html.contains("/logout"));

        let member = MemberInfo {
            id: 1,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            username: "jane@x.com".to_string(),
            is_member: true,
            is_admin: false,
        };
        let html = homepage(&sample_context(false), Some(&member), Some("You successfully logged in."));
        assert!(html.contains("Logged in as Jane Doe"));
        assert!(html.contains("/logout"));
        assert!(html.contains("You successfully logged in."));
    }
}
