use std::ops::{BitOr, RangeBounds};
use std::str::FromStr;
use std::{error, fmt};

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::breakpoints::Breakpoints;
use crate::query::WidthQuery;

bitflags! {
  #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
  #[must_use]
  pub struct SizeFlags: u16 {
    const XS = 1;
    const SM = 2;
    const MD = 4;
    const LG = 8;
    const XLG = 16;
  }
}

/// One of the five named viewport-width bands, in ascending width order.
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xlg,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xlg,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xlg => "xlg",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    const fn flag(self) -> SizeFlags {
        match self {
            Breakpoint::Xs => SizeFlags::XS,
            Breakpoint::Sm => SizeFlags::SM,
            Breakpoint::Md => SizeFlags::MD,
            Breakpoint::Lg => SizeFlags::LG,
            Breakpoint::Xlg => SizeFlags::XLG,
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Breakpoint {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xs" => Ok(Breakpoint::Xs),
            "sm" => Ok(Breakpoint::Sm),
            "md" => Ok(Breakpoint::Md),
            "lg" => Ok(Breakpoint::Lg),
            "xlg" => Ok(Breakpoint::Xlg),
            _ => Err(ResolveError::UnknownBreakpoint(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A size name did not match any of the five known bands. This is an
    /// integration mistake, not a runtime condition; resolving it to an
    /// empty query instead would silently never match and mask the bug.
    UnknownBreakpoint(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownBreakpoint(name) => {
                write!(f, "unknown breakpoint name: {name:?}")
            }
        }
    }
}

impl error::Error for ResolveError {}

/// One element of a size specification list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeToken {
    /// The wildcard marker, written as the empty string: extends the
    /// adjacent named range to the domain boundary.
    Any,
    Name(Breakpoint),
}

impl FromStr for SizeToken {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            Ok(SizeToken::Any)
        } else {
            s.parse().map(SizeToken::Name)
        }
    }
}

impl From<Breakpoint> for SizeToken {
    fn from(size: Breakpoint) -> Self {
        SizeToken::Name(size)
    }
}

/// Translates size specifications into media-query width ranges.
///
/// Built once from the resolved [`Breakpoints`]; immutable and stateless
/// afterwards, so every query method is pure, synchronous and reentrant.
pub struct SizeResolver {
    bands: [WidthQuery; 5],
}

impl SizeResolver {
    pub fn new(breakpoints: &Breakpoints) -> Self {
        let Breakpoints {
            sm_screen_width: sm,
            md_screen_width: md,
            lg_screen_width: lg,
            xlg_screen_width: xlg,
        } = *breakpoints;
        Self {
            bands: [
                WidthQuery::new(None, Some(sm)),
                WidthQuery::new(Some(sm), Some(md)),
                WidthQuery::new(Some(md), Some(lg)),
                WidthQuery::new(Some(lg), Some(xlg)),
                WidthQuery::new(Some(xlg), None),
            ],
        }
    }

    /// The query covering exactly one band.
    pub fn query(&self, size: Breakpoint) -> WidthQuery {
        self.bands[size.index()]
    }

    /// The query for a band given by name. Unknown names are an error, never
    /// an empty range.
    pub fn query_name(&self, name: &str) -> Result<WidthQuery, ResolveError> {
        name.parse().map(|size| self.query(size))
    }

    /// Resolves an ordered token list into a minimal set of width queries.
    ///
    /// Tokens are scanned left to right, accumulating index ranges into the
    /// band table. A named token closes the range currently awaiting its end,
    /// or opens a new one. A wildcard in first position opens a range at the
    /// bottom of the domain, a wildcard in last position extends the current
    /// range to the top; anywhere else it is inert. Each accumulated range
    /// becomes a single contiguous query, so adjacent bands named in sequence
    /// collapse into one expression. Queries are emitted in the order their
    /// ranges were opened and are not deduplicated.
    ///
    /// An inverted pair such as `[md, sm]` produces a degenerate query that
    /// never matches.
    pub fn queries(&self, tokens: &[SizeToken]) -> SmallVec<[WidthQuery; 2]> {
        struct Accumulated {
            start: usize,
            end: Option<usize>,
        }

        let mut ranges: Vec<Accumulated> = Vec::new();
        let last = tokens.len().checked_sub(1);
        for (i, token) in tokens.iter().enumerate() {
            match token {
                SizeToken::Name(size) => match ranges.last_mut() {
                    Some(range) if range.end.is_none() => range.end = Some(size.index()),
                    _ => ranges.push(Accumulated {
                        start: size.index(),
                        end: None,
                    }),
                },
                SizeToken::Any => {
                    // The xs band is already unbounded below and the xlg band
                    // above, so the sentinels are plain band indices.
                    if i == 0 {
                        ranges.push(Accumulated {
                            start: Breakpoint::Xs.index(),
                            end: None,
                        });
                    }
                    if Some(i) == last
                        && let Some(range) = ranges.last_mut()
                    {
                        range.end = Some(Breakpoint::Xlg.index());
                    }
                }
            }
        }

        ranges
            .iter()
            .map(|range| self.merged(range.start, range.end.unwrap_or(range.start)))
            .collect()
    }

    /// Resolves a band set into one merged query per contiguous run of
    /// members.
    pub fn queries_for(&self, sizes: ScreenSize) -> SmallVec<[WidthQuery; 2]> {
        let mut queries = SmallVec::new();
        let mut run: Option<(usize, usize)> = None;
        for size in Breakpoint::ALL {
            if sizes.contains(size) {
                let index = size.index();
                run = Some(match run {
                    Some((start, _)) => (start, index),
                    None => (index, index),
                });
            } else if let Some((start, end)) = run.take() {
                queries.push(self.merged(start, end));
            }
        }
        if let Some((start, end)) = run {
            queries.push(self.merged(start, end));
        }
        queries
    }

    fn merged(&self, start: usize, end: usize) -> WidthQuery {
        WidthQuery::new(self.bands[start].min_width(), self.bands[end].max_width())
    }
}

fn next(size: ScreenSize) -> ScreenSize {
    ScreenSize {
        flags: SizeFlags::from_bits(size.flags.bits() * 2).unwrap(),
    }
}

fn prev(size: ScreenSize) -> ScreenSize {
    ScreenSize {
        flags: SizeFlags::from_bits(size.flags.bits() / 2).unwrap(),
    }
}

/// Builds the set of every band between the two bounds.
///
/// # Panics
/// Panics if an excluded bound steps off the band scale: excluding `XS` as
/// an end bound (e.g. `range(..ScreenSize::XS)`) or excluding `XLG` as a
/// start bound leaves no band on that side.
pub fn range<R: RangeBounds<ScreenSize>>(range: R) -> ScreenSize {
    let start = match range.start_bound() {
        std::ops::Bound::Included(i) => *i,
        std::ops::Bound::Excluded(e) => next(*e),
        std::ops::Bound::Unbounded => ScreenSize::XS,
    };
    let end = match range.end_bound() {
        std::ops::Bound::Included(s) => *s,
        std::ops::Bound::Excluded(e) => prev(*e),
        std::ops::Bound::Unbounded => ScreenSize::XLG,
    };
    // We get the first enabled flag from start and the last from the end.
    // This ensures that if a SizeFlag with multiple flags set(e.g. XS|SM|MD) is passed to the range,
    // it will still work correctly.
    let lowest_start: SizeFlags = start.flags.iter().next().unwrap();
    let highest_end: SizeFlags = end.flags.iter().last().unwrap();

    let mask = highest_end.bits() - lowest_start.bits();
    // Subtract to get all the flags between the two, and then OR to ensure everything in the range
    // is set.
    let result = SizeFlags::from_bits(highest_end.bits() | mask | lowest_start.bits()).unwrap();

    ScreenSize { flags: result }
}

/// An unordered set of bands, for hosts that think in terms of "these sizes"
/// rather than an ordered specification list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    flags: SizeFlags,
}

impl ScreenSize {
    pub const XS: ScreenSize = ScreenSize::new(SizeFlags::XS);
    pub const SM: ScreenSize = ScreenSize::new(SizeFlags::SM);
    pub const MD: ScreenSize = ScreenSize::new(SizeFlags::MD);
    pub const LG: ScreenSize = ScreenSize::new(SizeFlags::LG);
    pub const XLG: ScreenSize = ScreenSize::new(SizeFlags::XLG);

    const fn new(flags: SizeFlags) -> Self {
        Self { flags }
    }

    pub const fn not(size: ScreenSize) -> Self {
        let flags = SizeFlags::all().difference(size.flags);
        Self { flags }
    }

    pub fn contains(&self, size: Breakpoint) -> bool {
        self.flags.contains(size.flag())
    }

    /// The member bands in ascending width order.
    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        Breakpoint::ALL
            .into_iter()
            .filter(|size| self.contains(*size))
            .collect()
    }
}

impl BitOr for ScreenSize {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::new(self.flags | rhs.flags)
    }
}

impl From<Breakpoint> for ScreenSize {
    fn from(size: Breakpoint) -> Self {
        Self::new(size.flag())
    }
}
