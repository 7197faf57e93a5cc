//! Resolves a located row into a `Story`.

use scraper::{ElementRef, Selector};
use url::Url;

use crate::locator::RowHandle;
use crate::models::Story;
use crate::page::Page;

type LinkStrategy = for<'a> fn(&Page, ElementRef<'a>) -> Option<(ElementRef<'a>, Url)>;

const LINK_STRATEGIES: &[(&str, LinkStrategy)] = &[
    ("titleline", titleline_link),
    ("external host", first_external_link),
    ("absolute http", first_http_link),
];

fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

/// Extract url, title and discussion link from a row. `None` means the row
/// has no usable link and any action on it should be skipped.
pub fn extract(page: &Page, row: RowHandle) -> Option<Story> {
    let element = row.element(page)?;

    let (link, url) = LINK_STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(page, element);
        if found.is_some() {
            log::trace!("story link found via {}", name);
        }
        found
    })?;

    let title = link.text().collect::<String>().trim().to_string();
    let url = url.to_string();
    let discussion_link = discussion_link(page, element).unwrap_or_else(|| url.clone());

    Some(Story {
        url,
        title,
        discussion_link,
    })
}

fn href_of(page: &Page, link: ElementRef<'_>) -> Option<Url> {
    link.value().attr("href").and_then(|href| page.resolve(href))
}

pub(crate) fn titleline_link<'a>(page: &Page, row: ElementRef<'a>) -> Option<(ElementRef<'a>, Url)> {
    let link = row.select(&css(".titleline > a")).next()?;
    let url = href_of(page, link)?;
    Some((link, url))
}

pub(crate) fn first_external_link<'a>(
    page: &Page,
    row: ElementRef<'a>,
) -> Option<(ElementRef<'a>, Url)> {
    row.select(&css("a[href]")).find_map(|link| {
        href_of(page, link)
            .filter(|url| page.is_external(url))
            .map(|url| (link, url))
    })
}

pub(crate) fn first_http_link<'a>(page: &Page, row: ElementRef<'a>) -> Option<(ElementRef<'a>, Url)> {
    let link = row.select(&css(r#"a[href^="http"]"#)).next()?;
    let url = href_of(page, link)?;
    Some((link, url))
}

/// Canonical discussion URL: an id on the row (or inside it) is the story id;
/// otherwise the first `item?id=` link.
fn discussion_link(page: &Page, row: ElementRef<'_>) -> Option<String> {
    let story_id = row
        .value()
        .id()
        .or_else(|| row.select(&css("[id]")).next().and_then(|e| e.value().id()))
        .filter(|id| !id.trim().is_empty());

    if let Some(id) = story_id {
        let mut url = page.base().join("/item").ok()?;
        url.query_pairs_mut().append_pair("id", id.trim());
        return Some(url.to_string());
    }

    row.select(&css(r#"a[href*="item?id="]"#))
        .find_map(|link| href_of(page, link))
        .map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::locate;
    use crate::page::Location;

    fn page(html: &str) -> Page {
        let location = Location::parse("https://news.ycombinator.com/news").unwrap();
        let base = location.base_url("news.ycombinator.com").unwrap();
        Page::parse(location, base, html)
    }

    fn first_story(html: &str) -> Option<Story> {
        let page = page(html);
        let rows = locate(&page);
        extract(&page, *rows.first()?)
    }

    #[test]
    fn test_titleline_link_with_row_id() {
        let story = first_story(
            r#"<table class="itemlist">
                <tr class="athing" id="4242">
                  <td>1.</td>
                  <td><span class="titleline"><a href="https://a.example/post">  A post  </a>
                      <span class="sitebit">(<a href="from?site=a.example">a.example</a>)</span></span></td>
                </tr></table>"#,
        )
        .unwrap();
        assert_eq!(story.url, "https://a.example/post");
        assert_eq!(story.title, "A post");
        assert_eq!(story.discussion_link, "https://news.ycombinator.com/item?id=4242");
    }

    #[test]
    fn test_external_link_fallback_and_descendant_id() {
        let story = first_story(
            r#"<table class="itemlist">
                <tr class="athing">
                  <td><span id="77">1.</span></td>
                  <td><a href="/user?id=bob">bob</a> <a href="https://b.example/">B story</a></td>
                </tr></table>"#,
        )
        .unwrap();
        assert_eq!(story.url, "https://b.example/");
        assert_eq!(story.title, "B story");
        assert_eq!(story.discussion_link, "https://news.ycombinator.com/item?id=77");
    }

    #[test]
    fn test_absolute_http_link_on_site_host() {
        let story = first_story(
            r#"<table class="itemlist">
                <tr class="athing">
                  <td>1.</td>
                  <td><a href="https://news.ycombinator.com/item?id=9">Ask HN: anything?</a></td>
                </tr></table>"#,
        )
        .unwrap();
        assert_eq!(story.url, "https://news.ycombinator.com/item?id=9");
        assert_eq!(story.discussion_link, "https://news.ycombinator.com/item?id=9");
    }

    #[test]
    fn test_discussion_link_from_comments_href() {
        let story = first_story(
            r#"<table class="itemlist">
                <tr class="athing">
                  <td>1.</td>
                  <td><a href="https://c.example/">C</a> | <a href="item?id=31">12 comments</a></td>
                </tr></table>"#,
        )
        .unwrap();
        assert_eq!(story.discussion_link, "https://news.ycombinator.com/item?id=31");
    }

    #[test]
    fn test_discussion_link_falls_back_to_story_url() {
        let story = first_story(
            r#"<table class="itemlist">
                <tr class="athing"><td>1.</td><td><a href="https://d.example/x">D</a></td></tr>
               </table>"#,
        )
        .unwrap();
        assert_eq!(story.discussion_link, "https://d.example/x");
    }

    #[test]
    fn test_row_without_links_is_unusable() {
        let story = first_story(
            r#"<table class="itemlist">
                <tr class="athing"><td>1.</td><td>[flagged]</td></tr>
               </table>"#,
        );
        assert!(story.is_none());
    }

    #[test]
    fn test_relative_links_alone_are_unusable() {
        let story = first_story(
            r#"<table class="itemlist">
                <tr class="athing"><td>1.</td><td><a href="item?id=3">Ask HN</a></td></tr>
               </table>"#,
        );
        assert!(story.is_none());
    }
}
