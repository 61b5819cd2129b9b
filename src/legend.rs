//! Legend identifiers and legend sets.
//!
//! A legend is the group of symbol shapes engraved onto one face. Legend sets
//! map legend ids to those shapes; glyph extraction happens elsewhere and
//! hands sets over already centred and upright.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{OperationError, Result};
use crate::geometry::Shape;

/// Identifier of a legend within a legend set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Legend(pub i32);

impl Legend {
    pub const BLANK: Legend = Legend(-1);
    pub const ZERO: Legend = Legend(0);
    pub const ONE: Legend = Legend(1);
    pub const TWO: Legend = Legend(2);
    pub const THREE: Legend = Legend(3);
    pub const FOUR: Legend = Legend(4);
    pub const FIVE: Legend = Legend(5);
    pub const SIX: Legend = Legend(6);
    pub const SEVEN: Legend = Legend(7);
    pub const EIGHT: Legend = Legend(8);
    pub const NINE: Legend = Legend(9);
    pub const TEN: Legend = Legend(10);
    pub const ELEVEN: Legend = Legend(11);
    pub const TWELVE: Legend = Legend(12);
    pub const THIRTEEN: Legend = Legend(13);
    pub const FOURTEEN: Legend = Legend(14);
    pub const FIFTEEN: Legend = Legend(15);
    pub const SIXTEEN: Legend = Legend(16);
    pub const SEVENTEEN: Legend = Legend(17);
    pub const EIGHTEEN: Legend = Legend(18);
    pub const NINETEEN: Legend = Legend(19);
    pub const TWENTY: Legend = Legend(20);
    /// Six with an underline or dot.
    pub const SIX_MARKED: Legend = Legend(21);
    /// Nine with an underline or dot.
    pub const NINE_MARKED: Legend = Legend(22);
    pub const THIRTY: Legend = Legend(23);
    pub const FORTY: Legend = Legend(24);
    pub const FIFTY: Legend = Legend(25);
    pub const SIXTY: Legend = Legend(26);
    pub const SEVENTY: Legend = Legend(27);
    pub const EIGHTY: Legend = Legend(28);
    pub const NINETY: Legend = Legend(29);
    pub const DOUBLE_ZERO: Legend = Legend(30);
    /// First id available for user-defined symbols.
    pub const CUSTOM_START: Legend = Legend(31);

    /// The `n`th user-defined symbol.
    #[must_use]
    pub fn custom(n: u16) -> Legend {
        Legend(Self::CUSTOM_START.0 + i32::from(n))
    }

    #[must_use]
    pub fn is_blank(self) -> bool {
        self.0 < 0
    }

    /// Slot of this legend in a set's storage, or `None` for blank.
    #[must_use]
    pub fn slot(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 31] = [
            "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN",
            "ELEVEN", "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN",
            "EIGHTEEN", "NINETEEN", "TWENTY", "SIX_MARKED", "NINE_MARKED", "THIRTY", "FORTY",
            "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY", "DOUBLE_ZERO",
        ];
        match self.slot() {
            None => f.write_str("BLANK"),
            Some(i) if i < NAMES.len() => f.write_str(NAMES[i]),
            Some(_) => write!(f, "CUSTOM_SYMBOL_({})", self.0),
        }
    }
}

/// Default legend for face `index` (zero based) of a die with `sides` faces.
///
/// A d10 shows 0 instead of 10, sixes are marked once nines can be confused
/// with them, and nines are always marked.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn pick_for_number(index: usize, sides: usize) -> Legend {
    if index >= sides {
        return Legend::BLANK;
    }
    match index + 1 {
        10 if sides == 10 => Legend::ZERO,
        10 => Legend::TEN,
        6 if sides > 8 => Legend::SIX_MARKED,
        9 => Legend::NINE_MARKED,
        n => Legend(n as i32),
    }
}

/// Default legend for face `index` (0..10) of a percentile die: 10, 20, ..., 90, 00.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn pick_for_doubles_by_index(index: usize) -> Legend {
    match index + 1 {
        n if n > 10 => Legend::BLANK,
        10 => Legend::DOUBLE_ZERO,
        1 => Legend::TEN,
        2 => Legend::TWENTY,
        n => Legend(20 + n as i32),
    }
}

/// A lookup from legend id to symbol shapes.
///
/// `revision` changes whenever the contents change, so `(id, revision)`
/// identifies one state of a set.
pub trait LegendSet {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn revision(&self) -> u64;

    /// Symbols of `legend`; empty for blank or unknown legends.
    fn get(&self, legend: Legend) -> &[Shape];

    /// Number of legend slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct LegendData {
    id: String,
    name: String,
    shapes: Vec<Vec<Shape>>,
}

/// A built-in legend set, cheap to clone and share.
#[derive(Debug, Clone)]
pub struct ImmutableLegendSet {
    data: Arc<LegendData>,
}

impl ImmutableLegendSet {
    /// Creates a set whose slot `i` holds the symbols of `Legend(i)`.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, shapes: Vec<Vec<Shape>>) -> Self {
        Self {
            data: Arc::new(LegendData {
                id: id.into(),
                name: name.into(),
                shapes,
            }),
        }
    }

    /// Copies the set into an editable one under a new id.
    #[must_use]
    pub fn to_mutable(&self, id: impl Into<String>) -> MutableLegendSet {
        MutableLegendSet {
            id: id.into(),
            name: self.data.name.clone(),
            shapes: self.data.shapes.clone(),
            revision: 0,
        }
    }
}

impl LegendSet for ImmutableLegendSet {
    fn id(&self) -> &str {
        &self.data.id
    }

    fn name(&self) -> &str {
        &self.data.name
    }

    fn revision(&self) -> u64 {
        0
    }

    fn get(&self, legend: Legend) -> &[Shape] {
        lookup(&self.data.shapes, legend)
    }

    fn len(&self) -> usize {
        self.data.shapes.len()
    }
}

/// A user-editable legend set.
#[derive(Debug, Clone)]
pub struct MutableLegendSet {
    id: String,
    /// Display name.
    pub name: String,
    shapes: Vec<Vec<Shape>>,
    revision: u64,
}

impl MutableLegendSet {
    /// Replaces the symbols of one legend and bumps the revision.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` when `legend` is blank.
    pub fn set(&mut self, legend: Legend, shapes: Vec<Shape>) -> Result<()> {
        let slot = legend
            .slot()
            .ok_or_else(|| OperationError::InvalidInput("cannot assign shapes to BLANK".into()))?;
        if slot >= self.shapes.len() {
            self.shapes.resize_with(slot + 1, Vec::new);
        }
        self.shapes[slot] = shapes;
        self.revision += 1;
        Ok(())
    }
}

impl LegendSet for MutableLegendSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn get(&self, legend: Legend) -> &[Shape] {
        lookup(&self.shapes, legend)
    }

    fn len(&self) -> usize {
        self.shapes.len()
    }
}

fn lookup(shapes: &[Vec<Shape>], legend: Legend) -> &[Shape] {
    legend
        .slot()
        .and_then(|i| shapes.get(i))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Loaded built-in legend sets, keyed by set id.
#[derive(Debug, Default)]
pub struct LegendCache {
    sets: HashMap<String, ImmutableLegendSet>,
}

impl LegendCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<ImmutableLegendSet> {
        self.sets.get(id).cloned()
    }

    /// Returns the cached set for `id`, loading it with `load` on first use.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; nothing is cached in that case.
    pub fn get_or_load(
        &mut self,
        id: &str,
        load: impl FnOnce() -> Result<ImmutableLegendSet>,
    ) -> Result<ImmutableLegendSet> {
        if let Some(set) = self.sets.get(id) {
            return Ok(set.clone());
        }
        let set = load()?;
        self.sets.insert(id.to_owned(), set.clone());
        Ok(set)
    }

    pub fn insert(&mut self, set: ImmutableLegendSet) {
        self.sets.insert(set.id().to_owned(), set);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
