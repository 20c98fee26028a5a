//! Rendering of matched postings into an email digest.

use html_escape::{encode_double_quoted_attribute, encode_text};
use jobalert_core::MatchedPosting;

/// A composed digest, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Builds the digest for one subscriber's matched postings.
///
/// Returns `None` when `postings` is empty: nothing to report is a normal
/// outcome, and no message should be sent.
#[must_use]
pub fn compose_digest(postings: &[MatchedPosting]) -> Option<Digest> {
    if postings.is_empty() {
        return None;
    }

    let count = postings.len();
    let subject = if count == 1 {
        "1 New Job Found".to_string()
    } else {
        format!("{count} New Jobs Found")
    };

    let mut html_body = String::new();
    let mut text_body = String::new();
    for matched in postings {
        let posting = &matched.posting;
        let skills = matched.skills.join(", ");
        let byline = byline(&posting.company, &posting.location);

        html_body.push_str(&format!(
            "<div style=\"padding:10px;margin:10px;border-left:4px solid blue;\">\
             <b>{title}</b><br>\
             {byline}<br>\
             Skills: {skills}<br>\
             <a href=\"{link}\">Apply Now</a>\
             </div>\n",
            title = encode_text(&posting.title),
            byline = encode_text(&byline),
            skills = encode_text(&skills),
            link = encode_double_quoted_attribute(&posting.url),
        ));

        text_body.push_str(&format!(
            "{title}\n{byline}\nSkills: {skills}\nApply: {link}\n\n",
            title = posting.title,
            link = posting.url,
        ));
    }

    Some(Digest {
        subject,
        html_body,
        text_body,
    })
}

fn byline(company: &str, location: &str) -> String {
    match (company.is_empty(), location.is_empty()) {
        (false, false) => format!("{company} - {location}"),
        (false, true) => company.to_string(),
        (true, false) => location.to_string(),
        (true, true) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use jobalert_core::CandidatePosting;

    use super::*;

    fn matched(id: u32, title: &str, company: &str, location: &str, skills: &[&str]) -> MatchedPosting {
        MatchedPosting {
            posting: CandidatePosting {
                url: format!("https://jobs.example.com/view/{id}"),
                title: title.to_string(),
                company: company.to_string(),
                location: location.to_string(),
            },
            skills: skills.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn empty_list_composes_nothing() {
        assert!(compose_digest(&[]).is_none());
    }

    #[test]
    fn one_block_per_posting() {
        let digest = compose_digest(&[
            matched(1, "Data Analyst", "Acme", "Remote", &["python", "sql"]),
            matched(2, "BI Developer", "Globex", "Berlin", &["power bi"]),
        ])
        .unwrap();

        assert_eq!(digest.subject, "2 New Jobs Found");
        assert_eq!(digest.html_body.matches("<div").count(), 2);
        assert!(digest.html_body.contains("<b>Data Analyst</b>"));
        assert!(digest.html_body.contains("Acme - Remote"));
        assert!(digest.html_body.contains("Skills: python, sql"));
        assert!(digest
            .html_body
            .contains("<a href=\"https://jobs.example.com/view/2\">Apply Now</a>"));
        assert!(digest.text_body.contains("BI Developer\nGlobex - Berlin\nSkills: power bi"));
    }

    #[test]
    fn postings_keep_their_order() {
        let digest = compose_digest(&[
            matched(1, "First", "A", "X", &["sql"]),
            matched(2, "Second", "B", "Y", &["sql"]),
        ])
        .unwrap();
        let first = digest.html_body.find("First").unwrap();
        let second = digest.html_body.find("Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn singular_subject_for_one_posting() {
        let digest = compose_digest(&[matched(1, "Analyst", "Acme", "Remote", &["excel"])]).unwrap();
        assert_eq!(digest.subject, "1 New Job Found");
    }

    #[test]
    fn missing_company_or_location_drops_separator() {
        assert_eq!(byline("Acme", ""), "Acme");
        assert_eq!(byline("", "Remote"), "Remote");
        assert_eq!(byline("", ""), "");
    }

    #[test]
    fn html_fields_are_escaped() {
        let digest = compose_digest(&[matched(
            1,
            "<script>alert(1)</script> & Co",
            "R&D <Labs>",
            "Remote",
            &["sql"],
        )])
        .unwrap();
        assert!(digest
            .html_body
            .contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; Co"));
        assert!(digest.html_body.contains("R&amp;D &lt;Labs&gt; - Remote"));
        assert!(!digest.html_body.contains("<script>"));
        assert!(digest.text_body.starts_with("<script>alert(1)</script> & Co\n"));
    }

    #[test]
    fn apply_link_cannot_break_out_of_href() {
        let mut posting = matched(1, "Analyst", "Acme", "Remote", &["sql"]);
        posting.posting.url = "https://jobs.example.com/view/1\"><img src=x>".to_string();

        let digest = compose_digest(&[posting]).unwrap();
        assert!(digest
            .html_body
            .contains("<a href=\"https://jobs.example.com/view/1&quot;"));
        assert!(!digest.html_body.contains("view/1\"><img"));
    }
}
