//! Server-rendered pages. Dynamic values always pass through `html_escape`
//! on the way into a page.

use html_escape::encode_text;

use crate::country::CountryInfo;
use crate::database::models::{blog::Blog, comment::Comment, user::User};

/// Shown on the login page after a failed attempt. One message for a wrong
/// password and an unknown username alike.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password.";

fn layout(title: &str, logged_in: bool, csrf_token: &str, main: &str) -> String {
    let nav = if logged_in {
        format!(
            concat!(
                r#"<a href="/">Home</a> <a href="/blog/new/">New blog</a> "#,
                r#"<form class="inline" method="post" action="/logout/">"#,
                r#"<input type="hidden" name="csrf_token" value="{csrf}">"#,
                r#"<button type="submit">Log out</button></form>"#
            ),
            csrf = encode_text(csrf_token)
        )
    } else {
        String::from(
            r#"<a href="/">Home</a> <a href="/login/">Log in</a> <a href="/register/">Register</a>"#,
        )
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<nav>{nav}</nav>\n<main>\n{main}\n</main>\n</body>\n</html>\n",
        title = encode_text(title),
        nav = nav,
        main = main
    )
}

pub fn blog_list_page(blogs: &[(Blog, User)], logged_in: bool, csrf_token: &str) -> String {
    let mut items = String::new();
    for (blog, author) in blogs {
        items.push_str(&format!(
            "<li><a href=\"/blog/{id}/\">{title}</a> by {author} on {date}</li>\n",
            id = blog.id,
            title = encode_text(&blog.title),
            author = encode_text(&author.username),
            date = blog.created_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    if items.is_empty() {
        items.push_str("<li>No blogs yet.</li>\n");
    }

    layout(
        "Blogs",
        logged_in,
        csrf_token,
        &format!("<h1>Blogs</h1>\n<ul>\n{}</ul>", items),
    )
}

fn country_section(country_tag: Option<&str>, info: Option<&CountryInfo>) -> String {
    let tag = match country_tag {
        Some(tag) => tag,
        None => return String::new(),
    };

    match info {
        Some(info) => {
            let heading = if info.name.common.is_empty() {
                tag
            } else {
                info.name.common.as_str()
            };
            let mut facts = String::new();
            if let Some(region) = &info.region {
                facts.push_str(&format!("<li>Region: {}</li>\n", encode_text(region)));
            }
            if let Some(subregion) = &info.subregion {
                facts.push_str(&format!("<li>Subregion: {}</li>\n", encode_text(subregion)));
            }
            if let Some(population) = info.population {
                facts.push_str(&format!("<li>Population: {}</li>\n", population));
            }
            if !info.capital.is_empty() {
                facts.push_str(&format!(
                    "<li>Capital: {}</li>\n",
                    encode_text(&info.capital.join(", "))
                ));
            }
            format!(
                "<section>\n<h2>About {}</h2>\n<ul>\n{}</ul>\n</section>",
                encode_text(heading),
                facts
            )
        }
        None => format!(
            "<section>\n<h2>About {}</h2>\n<p>No country information available.</p>\n</section>",
            encode_text(tag)
        ),
    }
}

pub fn blog_detail_page(
    blog: &Blog,
    author: &User,
    comments: &[(Comment, User)],
    like_count: i64,
    country_info: Option<&CountryInfo>,
    logged_in: bool,
    csrf_token: &str,
) -> String {
    let mut comment_items = String::new();
    for (comment, commenter) in comments {
        comment_items.push_str(&format!(
            "<li><strong>{who}</strong> ({when}): {what}</li>\n",
            who = encode_text(&commenter.username),
            when = comment.created_at.format("%Y-%m-%d %H:%M"),
            what = encode_text(&comment.body),
        ));
    }
    if comment_items.is_empty() {
        comment_items.push_str("<li>No comments yet.</li>\n");
    }

    let like_block = if logged_in {
        format!(
            concat!(
                "<p><span id=\"like-count\">{count}</span> likes ",
                "<button id=\"like-button\">Like / Unlike</button></p>\n",
                "<script>\n",
                "document.getElementById(\"like-button\").addEventListener(\"click\", function () {{\n",
                "    fetch(\"/blog/{id}/like/\", {{\n",
                "        method: \"POST\",\n",
                "        headers: {{ \"X-Csrf-Token\": \"{csrf}\" }}\n",
                "    }}).then(function (resp) {{ return resp.json(); }})\n",
                "      .then(function (data) {{\n",
                "        document.getElementById(\"like-count\").textContent = data.likes;\n",
                "      }});\n",
                "}});\n",
                "</script>"
            ),
            count = like_count,
            id = blog.id,
            csrf = encode_text(csrf_token),
        )
    } else {
        format!("<p><span id=\"like-count\">{}</span> likes</p>", like_count)
    };

    let comment_form = if logged_in {
        format!(
            concat!(
                "<form method=\"post\" action=\"/blog/{id}/comment/\">\n",
                "<input type=\"hidden\" name=\"csrf_token\" value=\"{csrf}\">\n",
                "<textarea name=\"body\" rows=\"4\" cols=\"60\"></textarea>\n",
                "<button type=\"submit\">Comment</button>\n",
                "</form>"
            ),
            id = blog.id,
            csrf = encode_text(csrf_token),
        )
    } else {
        String::from("<p><a href=\"/login/\">Log in</a> to comment or like.</p>")
    };

    let main = format!(
        "<h1>{title}</h1>\n<p>by {author} on {date}</p>\n<article>{body}</article>\n{country}\n{likes}\n<h2>Comments</h2>\n<ul>\n{comments}</ul>\n{form}",
        title = encode_text(&blog.title),
        author = encode_text(&author.username),
        date = blog.created_at.format("%Y-%m-%d %H:%M"),
        body = encode_text(&blog.body),
        country = country_section(blog.country.as_deref(), country_info),
        likes = like_block,
        comments = comment_items,
        form = comment_form,
    );

    layout(&blog.title, logged_in, csrf_token, &main)
}

pub fn login_page(failed: bool, csrf_token: &str) -> String {
    let notice = if failed {
        format!("<p class=\"error\">{}</p>\n", LOGIN_FAILED_MESSAGE)
    } else {
        String::new()
    };

    let main = format!(
        concat!(
            "<h1>Log in</h1>\n{notice}",
            "<form method=\"post\" action=\"/login/\">\n",
            "<input type=\"hidden\" name=\"csrf_token\" value=\"{csrf}\">\n",
            "<label>Username <input type=\"text\" name=\"username\"></label>\n",
            "<label>Password <input type=\"password\" name=\"password\"></label>\n",
            "<button type=\"submit\">Log in</button>\n",
            "</form>"
        ),
        notice = notice,
        csrf = encode_text(csrf_token),
    );

    layout("Log in", false, csrf_token, &main)
}

pub fn register_page(error: Option<&str>, csrf_token: &str) -> String {
    let notice = match error {
        Some(msg) => format!("<p class=\"error\">{}</p>\n", encode_text(msg)),
        None => String::new(),
    };

    let main = format!(
        concat!(
            "<h1>Register</h1>\n{notice}",
            "<form method=\"post\" action=\"/register/\">\n",
            "<input type=\"hidden\" name=\"csrf_token\" value=\"{csrf}\">\n",
            "<label>Username <input type=\"text\" name=\"username\"></label>\n",
            "<label>Password <input type=\"password\" name=\"password\"></label>\n",
            "<button type=\"submit\">Register</button>\n",
            "</form>"
        ),
        notice = notice,
        csrf = encode_text(csrf_token),
    );

    layout("Register", false, csrf_token, &main)
}

pub fn new_blog_page(error: Option<&str>, csrf_token: &str) -> String {
    let notice = match error {
        Some(msg) => format!("<p class=\"error\">{}</p>\n", encode_text(msg)),
        None => String::new(),
    };

    let main = format!(
        concat!(
            "<h1>New blog</h1>\n{notice}",
            "<form method=\"post\" action=\"/blog/new/\">\n",
            "<input type=\"hidden\" name=\"csrf_token\" value=\"{csrf}\">\n",
            "<label>Title <input type=\"text\" name=\"title\"></label>\n",
            "<label>Country <input type=\"text\" name=\"country\" placeholder=\"optional\"></label>\n",
            "<textarea name=\"body\" rows=\"10\" cols=\"60\"></textarea>\n",
            "<button type=\"submit\">Publish</button>\n",
            "</form>"
        ),
        notice = notice,
        csrf = encode_text(csrf_token),
    );

    layout("New blog", true, csrf_token, &main)
}
