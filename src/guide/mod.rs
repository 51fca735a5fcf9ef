//! # Timeline Guides
//!
//! A guide file holds one line per detected beat: the beat's timestamp
//! (shifted by the run's offset) followed by a space and the beat's 0-based
//! index. Video editors such as Kdenlive import these lines as timeline
//! markers.
//!
//! ```rust
//! use beatfinder::guide::{GuideEntry, Timecode};
//!
//! let offset: Timecode = "0:00:01".parse().unwrap();
//! let entries = GuideEntry::from_beats(&[1.0, 2.5], offset);
//! assert_eq!(entries[1].to_string(), "0:00:03.500000 1");
//! ```

pub mod timecode;
pub mod writer;

pub use timecode::Timecode;
pub use writer::{GuideEntry, GuideWriter};
