//! Font and encoding resolution.
//!
//! A [`FontRef`] — produced by the outer object-graph reader — names its
//! encoding and, optionally, a ToUnicode stream by object id. Resolution
//! reads the Differences overrides and parses the ToUnicode CMap, memoized
//! per object id for the life of the session: concurrent requests for the
//! same id observe a single in-flight resolution.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use artboard_core::{BaseEncoding, Warning};
use once_cell::sync::OnceCell;

use crate::cmap::parse_to_unicode;
use crate::error::ParseError;
use crate::session::StreamFetcher;

/// An indirect object id.
pub type ObjId = u64;

/// One entry of a `/Differences` array: a code restarts the running code,
/// a glyph name maps the running code and increments it.
#[derive(Debug, Clone, PartialEq)]
pub enum DifferencesEntry {
    /// Restart the running code.
    Code(u32),
    /// Map the running code to a glyph name.
    Glyph(String),
}

/// The encoding named by a font dictionary, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingRef {
    /// A bare base-encoding name.
    Base(BaseEncoding),
    /// A base encoding with Differences overrides.
    Derived {
        /// The base encoding.
        base: BaseEncoding,
        /// The raw Differences entries.
        differences: Vec<DifferencesEntry>,
    },
}

/// A font reference as handed in through the Resources descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRef {
    /// Object id of the font dictionary, the memoization key.
    pub obj_id: ObjId,
    /// The font's encoding.
    pub encoding: EncodingRef,
    /// Object id of the ToUnicode CMap stream, if referenced.
    pub to_unicode: Option<ObjId>,
}

/// A font's resolved decode table.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoding {
    /// A bare base encoding.
    Base(BaseEncoding),
    /// A base encoding with per-code glyph-name overrides.
    Derived {
        /// The base encoding.
        base: BaseEncoding,
        /// Code → glyph name overrides from the Differences array.
        differences: HashMap<u32, String>,
    },
}

/// A resolved font.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// The resolved encoding.
    pub encoding: Encoding,
    /// Code → string mappings from the ToUnicode CMap, if present.
    pub to_unicode: Option<HashMap<u32, String>>,
}

impl Font {
    /// Decode one character code: ToUnicode first, then Differences, then
    /// the base-encoding table. Unmapped codes decode to the empty string.
    pub fn decode_code(&self, code: u32) -> String {
        if let Some(map) = &self.to_unicode {
            if let Some(text) = map.get(&code) {
                return text.clone();
            }
        }
        let base = match &self.encoding {
            Encoding::Base(base) => base,
            Encoding::Derived { base, differences } => {
                if let Some(glyph) = differences.get(&code) {
                    if let Some(ch) = artboard_core::glyph_name_to_char(glyph) {
                        return ch.to_string();
                    }
                }
                base
            }
        };
        base.decode(code).map(String::from).unwrap_or_default()
    }
}

/// Expand a Differences array into its code → glyph-name map.
fn expand_differences(entries: &[DifferencesEntry]) -> HashMap<u32, String> {
    let mut map = HashMap::new();
    let mut code = 0u32;
    for entry in entries {
        match entry {
            DifferencesEntry::Code(n) => code = *n,
            DifferencesEntry::Glyph(name) => {
                map.insert(code, name.clone());
                code += 1;
            }
        }
    }
    map
}

/// Session-wide font cache with at-most-once resolution per object id.
///
/// The map hands out one [`OnceCell`] slot per id; the first caller runs the
/// resolution inside the slot while any concurrent caller for the same id
/// blocks on it and then shares the result.
#[derive(Default)]
pub struct FontResolver {
    cache: Mutex<HashMap<ObjId, Arc<OnceCell<Arc<Font>>>>>,
}

impl FontResolver {
    /// An empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a font, memoized by `font_ref.obj_id`.
    ///
    /// Warnings raised during resolution (e.g. skipped `bfrange` sections)
    /// are recorded only by the call that performs it.
    pub fn get(
        &self,
        fetcher: &dyn StreamFetcher,
        font_ref: &FontRef,
        warnings: &mut Vec<Warning>,
    ) -> Result<Arc<Font>, ParseError> {
        let slot = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cache.entry(font_ref.obj_id).or_default())
        };
        slot.get_or_try_init(|| Ok(Arc::new(resolve(fetcher, font_ref, warnings)?)))
            .cloned()
    }
}

fn resolve(
    fetcher: &dyn StreamFetcher,
    font_ref: &FontRef,
    warnings: &mut Vec<Warning>,
) -> Result<Font, ParseError> {
    let to_unicode = match font_ref.to_unicode {
        Some(obj_id) => {
            let bytes = fetcher.fetch(obj_id)?;
            Some(parse_to_unicode(&bytes, warnings)?)
        }
        None => None,
    };
    let encoding = match &font_ref.encoding {
        EncodingRef::Base(base) => Encoding::Base(*base),
        EncodingRef::Derived { base, differences } => Encoding::Derived {
            base: *base,
            differences: expand_differences(differences),
        },
    };
    Ok(Font {
        encoding,
        to_unicode,
    })
}
