//! Property-based tests for catalog filtering
//!
//! Uses proptest to check the filtered view invariants across random catalogs.

use leakify_core::{filter_indices, Catalog, FilterSpec, Scope, Song};
use proptest::prelude::*;

// ===== Helpers =====

fn arbitrary_song() -> impl Strategy<Value = Song> {
    (
        "[a-z0-9]{1,10}",                                        // filename
        "[A-Za-z ]{1,20}",                                       // title
        prop::sample::select(vec!["Ye", "Carti", "Uzi", "Future"]), // artist
        proptest::option::of(prop::sample::select(vec!["LEAKED", "REMASTER", "SESSION"])),
        proptest::option::of("[A-Za-z]{1,8}"),                   // subfolder
    )
        .prop_map(|(filename, title, artist, tag, subfolder)| Song {
            filename: format!("{filename}.mp3"),
            title,
            artist: artist.to_string(),
            subfolder,
            tag: tag.map(str::to_string),
            url: None,
        })
}

fn arbitrary_filter() -> impl Strategy<Value = FilterSpec> {
    let scope = prop_oneof![
        Just(Scope::All),
        prop::sample::select(vec!["Ye", "Carti", "Nobody"]).prop_map(|a| Scope::Artist(a.into())),
        prop::sample::select(vec!["leaked", "REMASTER"]).prop_map(|t| Scope::Tag(t.into())),
    ];
    (scope, "[a-eA-E ]{0,3}").prop_map(|(scope, search)| FilterSpec { scope, search })
}

// ===== Property Tests =====

proptest! {
    /// Property: the view is a strictly increasing index sequence (catalog order)
    #[test]
    fn view_is_ordered_subsequence(
        songs in prop::collection::vec(arbitrary_song(), 0..40),
        filter in arbitrary_filter(),
    ) {
        let view = filter_indices(&songs, &filter);
        prop_assert!(view.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(view.iter().all(|&idx| idx < songs.len()));
    }

    /// Property: applying the same filter twice yields the same view
    #[test]
    fn apply_filter_is_idempotent(
        songs in prop::collection::vec(arbitrary_song(), 0..40),
        filter in arbitrary_filter(),
    ) {
        let mut catalog = Catalog::new();
        catalog.replace(songs);

        catalog.apply_filter(filter.clone());
        let first = catalog.view_indices().to_vec();
        catalog.apply_filter(filter);
        prop_assert_eq!(catalog.view_indices(), first.as_slice());
    }

    /// Property: every song left out of the view fails the predicate
    #[test]
    fn view_is_exactly_the_matches(
        songs in prop::collection::vec(arbitrary_song(), 0..40),
        filter in arbitrary_filter(),
    ) {
        let view = filter_indices(&songs, &filter);
        for (idx, song) in songs.iter().enumerate() {
            prop_assert_eq!(view.contains(&idx), filter.matches(song));
        }
    }
}
