//! Neutralizes markup in free text fields before they are sent to clients.
//!
//! Stored data is never modified, sanitizing happens on every read path.
//! Output is HTML: unsafe tags and attributes are stripped and text is
//! entity escaped, so `Tom & Jerry` is returned as `Tom &amp; Jerry`.

use bookmarks_dal::bookmark::Bookmark;

/// Cleans `title` and `description`, other fields are passed through.
pub fn sanitize(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        title: ammonia::clean(&bookmark.title),
        description: ammonia::clean(&bookmark.description),
        ..bookmark
    }
}

pub fn sanitize_all(bookmarks: Vec<Bookmark>) -> Vec<Bookmark> {
    bookmarks.into_iter().map(sanitize).collect()
}
