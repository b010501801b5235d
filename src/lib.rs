//! Caption synchronisation for a remote audio library.
//!
//! [`parser`] turns timestamped caption text into an ordered list of
//! [`CaptionEntry`] values, and [`CaptionTimeline`] tracks which of them is
//! active as playback position samples arrive:
//!
//! ```
//! use lrcsync::{parse_captions, CaptionTimeline};
//!
//! let mut timeline = CaptionTimeline::new(parse_captions("[00:00]intro\n[00:05]verse"));
//! assert_eq!(timeline.update(6.0).index, Some(1));
//! assert_eq!(timeline.update(1.0).index, Some(0));
//! ```

pub mod caption;
pub mod config;
pub mod error;
pub mod library;
pub mod parser;
pub mod sampler;
pub mod serialiser;
pub mod source;
pub mod timeline;

pub use caption::{CaptionDocument, CaptionEntry, Metadata};
pub use error::SyncError;
pub use parser::{parse_captions, MultiTag, ParseOptions, Parser};
pub use timeline::{CaptionTimeline, TimelineState, Update};
