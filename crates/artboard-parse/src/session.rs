//! Parse sessions: injected collaborators, shared caches, and parallel
//! artboard interpretation.
//!
//! A [`Session`] owns the font and XObject resolution caches for one file.
//! Independent artboards may be interpreted concurrently; the caches are
//! shared across them, keyed by immutable object ids, with at-most-one
//! resolution per id. A failed fetch is fatal only for the artboard being
//! parsed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use artboard_core::{Node, ParseOutcome};
use once_cell::sync::OnceCell;
use rayon::prelude::*;

use crate::error::ParseError;
use crate::font::{FontResolver, ObjId};
use crate::interpreter::{Resources, parse_content};

/// The injected collaborator that fetches an indirect object's stream
/// bytes (ToUnicode CMaps, nested XObject content streams).
///
/// Implementations may block; the interpreter calls this only at its
/// suspension points. Retry policy belongs to the implementation — the
/// core never retries.
pub trait StreamFetcher: Sync {
    /// Fetch the decoded stream bytes of the object `obj_id`.
    fn fetch(&self, obj_id: ObjId) -> Result<Vec<u8>, ParseError>;
}

/// One artboard's content stream and the resources in scope for it.
#[derive(Debug, Clone)]
pub struct Artboard {
    /// The decoded content-stream bytes.
    pub content: Vec<u8>,
    /// The resources descriptor for this artboard.
    pub resources: Resources,
}

type XObjectCache = Mutex<HashMap<ObjId, Arc<OnceCell<Arc<ParseOutcome<Vec<Node>>>>>>>;

/// A parse session over one file.
pub struct Session<F: StreamFetcher> {
    fetcher: F,
    strict_compat: bool,
    fonts: FontResolver,
    xobjects: XObjectCache,
}

impl<F: StreamFetcher> Session<F> {
    /// A session with reference-compatibility transforms disabled.
    pub fn new(fetcher: F) -> Self {
        Self::with_compat(fetcher, false)
    }

    /// A session with an explicit `strictPopplerCompat` setting.
    pub fn with_compat(fetcher: F, strict_compat: bool) -> Self {
        Self {
            fetcher,
            strict_compat,
            fonts: FontResolver::new(),
            xobjects: Mutex::new(HashMap::new()),
        }
    }

    /// Whether reference-compatibility transforms are enabled.
    pub fn strict_compat(&self) -> bool {
        self.strict_compat
    }

    /// Interpret one content stream.
    pub fn parse_content(
        &self,
        data: &[u8],
        resources: &Resources,
    ) -> Result<ParseOutcome<Vec<Node>>, ParseError> {
        parse_content(
            data,
            resources,
            &self.fetcher,
            &self.fonts,
            self.strict_compat,
        )
    }

    /// Interpret the content stream of the XObject `obj_id`, at most once
    /// per session.
    ///
    /// A second request for the same id while the first is still resolving
    /// blocks on and then shares the in-flight result.
    pub fn parse_xobject(
        &self,
        obj_id: ObjId,
        resources: &Resources,
    ) -> Result<Arc<ParseOutcome<Vec<Node>>>, ParseError> {
        let slot = {
            let mut cache = self.xobjects.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cache.entry(obj_id).or_default())
        };
        slot.get_or_try_init(|| {
            let bytes = self.fetcher.fetch(obj_id)?;
            Ok(Arc::new(self.parse_content(&bytes, resources)?))
        })
        .cloned()
    }

    /// Interpret independent artboards in parallel.
    ///
    /// Each artboard gets its own interpreter state; the font and XObject
    /// caches are shared. A failure is returned in that artboard's slot
    /// without affecting its siblings.
    pub fn parse_artboards(
        &self,
        artboards: &[Artboard],
    ) -> Vec<Result<ParseOutcome<Vec<Node>>, ParseError>> {
        artboards
            .par_iter()
            .map(|artboard| self.parse_content(&artboard.content, &artboard.resources))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MapFetcher {
        streams: HashMap<ObjId, Vec<u8>>,
        calls: AtomicUsize,
    }

    impl MapFetcher {
        fn new(streams: impl IntoIterator<Item = (ObjId, Vec<u8>)>) -> Self {
            Self {
                streams: streams.into_iter().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl StreamFetcher for MapFetcher {
        fn fetch(&self, obj_id: ObjId) -> Result<Vec<u8>, ParseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.streams
                .get(&obj_id)
                .cloned()
                .ok_or_else(|| ParseError::Fetch(format!("object {obj_id} unavailable")))
        }
    }

    #[test]
    fn xobject_streams_parse_at_most_once() {
        let fetcher = MapFetcher::new([(7, b"0 0 m 10 10 l S".to_vec())]);
        let session = Session::new(fetcher);
        let resources = Resources::default();

        let first = session.parse_xobject(7, &resources).unwrap();
        let second = session.parse_xobject(7, &resources).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(session.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.value.len(), 1);
    }

    #[test]
    fn missing_xobject_is_a_fetch_error() {
        let session = Session::new(MapFetcher::new([]));
        assert!(matches!(
            session.parse_xobject(9, &Resources::default()),
            Err(ParseError::Fetch(_))
        ));
    }

    #[test]
    fn artboards_parse_in_parallel_with_failure_isolation() {
        let session = Session::new(MapFetcher::new([]));
        let artboards = vec![
            Artboard {
                content: b"0 0 m 5 5 l S".to_vec(),
                resources: Resources::default(),
            },
            // Unbalanced EMC: fatal for this artboard only.
            Artboard {
                content: b"EMC".to_vec(),
                resources: Resources::default(),
            },
            Artboard {
                content: b"/OC /MC0 BDC EMC".to_vec(),
                resources: Resources::default(),
            },
        ];

        let results = session.parse_artboards(&artboards);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ParseError::Assertion(_))));
        assert_eq!(results[2].as_ref().unwrap().value.len(), 1);
    }

    #[test]
    fn artboards_share_the_font_cache() {
        use crate::font::{EncodingRef, FontRef};
        use artboard_core::BaseEncoding;

        let fetcher = MapFetcher::new([(
            40,
            b"1 beginbfchar <41> <0041> endbfchar".to_vec(),
        )]);
        let session = Session::new(fetcher);

        let mut resources = Resources::default();
        resources.font.insert(
            "F1".to_string(),
            FontRef {
                obj_id: 4,
                encoding: EncodingRef::Base(BaseEncoding::WinAnsi),
                to_unicode: Some(40),
            },
        );

        let artboards: Vec<Artboard> = (0..4)
            .map(|_| Artboard {
                content: b"BT /F1 12 Tf (A) Tj ET".to_vec(),
                resources: resources.clone(),
            })
            .collect();

        let results = session.parse_artboards(&artboards);
        assert!(results.iter().all(Result::is_ok));
        // One ToUnicode fetch despite four artboards using the font.
        assert_eq!(session.fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
