//! Duplicate-aware bulk insertion into playlists.
//!
//! A candidate is a duplicate when its song is already in the playlist. A
//! source group (album, artist) is a duplicate group when every one of its
//! songs is a duplicate. Duplicates are a result, never an error: the caller
//! gets `success = false` and decides whether to retry with an explicit
//! `force_add`.

pub mod resolver;

pub use resolver::{assign_playlist_positions, partition_and_filter, Candidate, DuplicateResolution};
