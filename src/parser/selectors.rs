//! CSS selectors for marketplace search-result pages
//!
//! Listing markup is unversioned and drifts over time, so blocks are located
//! through an ordered cascade of increasingly generic selectors. The first
//! tier that yields any match wins and later tiers are never consulted.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    // Exact compound class signature of a listing's info container
    static ref EXACT_INFO: Selector = parse_selector!(r#"div[class="s-item__info clearfix"]"#);

    // Any div in the same class family
    static ref LOOSE_INFO: Selector = parse_selector!(r#"div[class*="s-item__info"]"#);

    // Structural fallbacks, most specific first
    static ref STRUCTURAL: Vec<(&'static str, Selector)> = vec![
        ("div.s-item__wrapper", parse_selector!("div.s-item__wrapper")),
        ("div.s-item", parse_selector!("div.s-item")),
        (".srp-results .s-item", parse_selector!(".srp-results .s-item")),
    ];

    // Per-block selectors
    static ref TITLE: Selector = parse_selector!(".s-item__title");
    static ref TITLE_LABEL: Selector = parse_selector!("span");
    static ref PRICE: Selector = parse_selector!("span.s-item__price");
    static ref ANCHOR: Selector = parse_selector!("a");
}

/// A matcher mapping a document to candidate listing blocks
pub type BlockMatcher =
    Box<dyn for<'a> Fn(&'a Html) -> Vec<ElementRef<'a>> + Send + Sync + 'static>;

/// One level of the selector cascade
pub struct SelectorTier {
    name: &'static str,
    matcher: BlockMatcher,
}

impl SelectorTier {
    /// Create a tier from an arbitrary matcher function
    pub fn new<F>(name: &'static str, matcher: F) -> Self
    where
        F: for<'a> Fn(&'a Html) -> Vec<ElementRef<'a>> + Send + Sync + 'static,
    {
        Self {
            name,
            matcher: Box::new(matcher),
        }
    }

    /// Create a tier backed by a static CSS selector
    pub fn from_selector(name: &'static str, selector: &'static Selector) -> Self {
        Self::new(name, move |document: &Html| {
            document.select(selector).collect()
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run this tier's matcher against a document
    pub fn find<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        (self.matcher)(document)
    }
}

impl std::fmt::Debug for SelectorTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorTier").field("name", &self.name).finish()
    }
}

/// Ordered list of tiers; the first non-empty result short-circuits the rest
#[derive(Debug)]
pub struct SelectorCascade {
    tiers: Vec<SelectorTier>,
}

/// Blocks located by the cascade, with the index and name of the tier used
#[derive(Debug)]
pub struct CascadeMatch<'a> {
    pub tier_index: usize,
    pub tier_name: &'static str,
    pub blocks: Vec<ElementRef<'a>>,
}

impl SelectorCascade {
    /// Build a cascade from explicit tiers
    pub fn new(tiers: Vec<SelectorTier>) -> Self {
        Self { tiers }
    }

    /// The default cascade for eBay search results
    ///
    /// 1. `div[class="s-item__info clearfix"]`
    /// 2. `div[class*="s-item__info"]`
    /// 3. `div.s-item__wrapper`, `div.s-item`, `.srp-results .s-item`
    pub fn listing_default() -> Self {
        let mut tiers = vec![
            SelectorTier::from_selector("s-item__info clearfix", &EXACT_INFO),
            SelectorTier::from_selector("s-item__info*", &LOOSE_INFO),
        ];

        tiers.extend(
            STRUCTURAL
                .iter()
                .map(|(name, selector)| SelectorTier::from_selector(*name, selector)),
        );

        Self::new(tiers)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Locate candidate blocks using the first tier that matches anything
    pub fn locate<'a>(&self, document: &'a Html) -> Option<CascadeMatch<'a>> {
        self.tiers
            .iter()
            .enumerate()
            .find_map(|(tier_index, tier)| {
                let blocks = tier.find(document);
                (!blocks.is_empty()).then(|| CascadeMatch {
                    tier_index,
                    tier_name: tier.name(),
                    blocks,
                })
            })
    }
}

impl Default for SelectorCascade {
    fn default() -> Self {
        Self::listing_default()
    }
}

/// Selectors applied inside a single listing block
pub struct BlockSelectors {
    pub title: &'static Selector,
    pub title_label: &'static Selector,
    pub price: &'static Selector,
    pub anchor: &'static Selector,
}

impl BlockSelectors {
    pub fn new() -> Self {
        Self {
            title: &TITLE,
            title_label: &TITLE_LABEL,
            price: &PRICE,
            anchor: &ANCHOR,
        }
    }
}

impl Default for BlockSelectors {
    fn default() -> Self {
        Self::new()
    }
}
