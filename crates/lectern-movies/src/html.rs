//! Server-side HTML for the recommendation page.

use std::fmt::Write;

use lectern_recommend::{MovieRecord, MovieTable, PageView, Recommendation};

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
.grid{display:grid;grid-template-columns:1fr 1fr;gap:1rem}\
.card{border:1px solid #ddd;border-radius:6px;padding:0.75rem 1rem}\
.pages a,.pages span{margin-right:0.5rem}";

/// Render the full page for `view`, showing cards of 1-based `page`.
pub fn render_page(table: &MovieTable, view: &PageView, page: usize, page_size: usize) -> String {
    let page_count = view.page_count(page_size);
    let page = page.clamp(1, page_count);

    let mut html = String::new();
    let _ = write!(
        html,
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>Movie Recommendation System</title><style>{STYLE}</style></head><body>\
         <h1>Movie Recommendation System</h1>"
    );

    html.push_str(&render_search(table, view.selected.id));

    html.push_str("<h2>Selected Movie</h2>");
    html.push_str(&render_details(&view.selected));
    html.push_str("<hr>");

    html.push_str("<h2>Recommended Movies</h2><div class=\"grid\">");
    for rec in view.page(page - 1, page_size) {
        html.push_str(&render_card(rec));
    }
    html.push_str("</div>");

    if page_count > 1 {
        html.push_str(&render_pagination(page, page_count));
    }

    html.push_str("</body></html>");
    html
}

fn render_search(table: &MovieTable, selected: i64) -> String {
    let mut html = String::from(
        "<form method=\"post\" action=\"/select\"><label for=\"id\">Search a movie</label> \
         <select id=\"id\" name=\"id\">",
    );
    for movie in table.iter() {
        let marker = if movie.id == selected { " selected" } else { "" };
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            movie.id,
            marker,
            escape_html(&movie.title)
        );
    }
    html.push_str("</select> <button type=\"submit\">Show</button></form>");
    html
}

fn render_details(movie: &MovieRecord) -> String {
    format!(
        "<h3>{}</h3><p>Rating: {}</p><p>Genres: {}</p><p>Actors: {}</p>",
        escape_html(&movie.title),
        movie.rating,
        escape_html(&movie.genres.join(", ")),
        escape_html(&movie.actors.join(", ")),
    )
}

fn render_card(rec: &Recommendation) -> String {
    format!(
        "<div class=\"card\">{}<p><strong>Score:</strong> {:.2}</p>\
         <form method=\"post\" action=\"/select\">\
         <input type=\"hidden\" name=\"id\" value=\"{}\">\
         <button type=\"submit\">Select</button></form></div>",
        render_details(&rec.movie),
        rec.similarity_score,
        rec.movie.id,
    )
}

fn render_pagination(page: usize, page_count: usize) -> String {
    let mut html = String::from("<nav class=\"pages\">");
    for p in 1..=page_count {
        if p == page {
            let _ = write!(html, "<span>{}</span>", p);
        } else {
            let _ = write!(html, "<a href=\"/?page={}\">{}</a>", p, p);
        }
    }
    html.push_str("</nav>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape_html("<b>Tom & \"Jerry\"</b>'s"),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;&#39;s"
        );
        assert_eq!(escape_html("Amélie"), "Amélie");
    }

    #[test]
    fn test_card_shows_two_decimal_score() {
        let rec = Recommendation {
            movie: MovieRecord {
                id: 42,
                title: "Heat".into(),
                rating: 8.3,
                genres: vec!["Crime".into(), "Drama".into()],
                actors: vec!["Al Pacino".into()],
                vector: vec![1.0],
            },
            similarity_score: 0.87654,
        };
        let html = render_card(&rec);
        assert!(html.contains("<strong>Score:</strong> 0.88"));
        assert!(html.contains("Genres: Crime, Drama"));
        assert!(html.contains("name=\"id\" value=\"42\""));
    }

    #[test]
    fn test_pagination_marks_current_page() {
        let html = render_pagination(2, 3);
        assert!(html.contains("<a href=\"/?page=1\">1</a>"));
        assert!(html.contains("<span>2</span>"));
        assert!(html.contains("<a href=\"/?page=3\">3</a>"));
    }
}
