//! Per-edge barcode distributions.
//!
//! Each oriented edge of the graph owns an entry mapping barcode identifiers
//! to the evidence collected for that barcode near the head of the edge. The
//! evidence comes in two granularities: [`SimpleBarcodeInfo`] keeps a read
//! count and a position range, while [`FrameBarcodeInfo`] divides the edge
//! into fixed-width frames and keeps one coverage bit per frame in a packed
//! bitset. The matching entry types are [`SimpleEdgeEntry`] and
//! [`FrameEdgeEntry`]; the [`BarcodeEntry`] trait is the capability set the
//! index requires from either of them.
//!
//! Entries serialize to a line-oriented text form:
//!
//! ```text
//! <n_barcodes>
//! <barcode_id> <info>     (n_barcodes lines, in barcode id order)
//! ```
//!
//! where `<info>` is `<count> <start> <end>` for the simple variant and
//! `<count> <bitset>` for the framed variant. The bitset is printed with the
//! highest frame index first.

use crate::support::{BarcodeId, EdgeId, Error};

use simple_sds::raw_vector::{AccessRaw, RawVector};

use std::collections::btree_map::{Iter, Keys};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::ops::Range;
use std::str::FromStr;
use std::{cmp, fmt, io};


//-----------------------------------------------------------------------------

// Reads one line, stripping the terminator. Returns `None` at end of stream.
pub(crate) fn read_opt_line<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<String>, Error> {
    let mut line = String::new();
    let len = reader.read_line(&mut line)?;
    if len == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

// Reads one line, failing if the stream has ended.
pub(crate) fn read_line<R: BufRead + ?Sized>(reader: &mut R) -> Result<String, Error> {
    match read_opt_line(reader)? {
        Some(line) => Ok(line),
        None => Err(Error::MalformedSerialization("unexpected end of stream".to_string())),
    }
}

fn parse_token<T: FromStr>(token: Option<&str>, what: &str) -> Result<T, Error> {
    let token = token.ok_or_else(|| Error::MalformedSerialization(format!("missing {}", what)))?;
    token.parse().map_err(|_| Error::MalformedSerialization(format!("invalid {}: {}", what, token)))
}

//-----------------------------------------------------------------------------

/// Coarse per-barcode evidence: a read count and a position range.
///
/// The range is the half-open interval of nucleotide positions, measured from
/// the 5′ end of the edge, covered by the reads carrying the barcode. Updates
/// add counts and extend the range componentwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleBarcodeInfo {
    count: u64,
    range: Range<usize>,
}

impl SimpleBarcodeInfo {
    /// Creates an info with the given count and range.
    pub fn new(count: u64, range: Range<usize>) -> Self {
        SimpleBarcodeInfo {
            count: count,
            range: range,
        }
    }

    /// Returns the number of reads recorded for the barcode.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the position range covered by the recorded reads.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Adds `count` reads covering `range`.
    pub fn update(&mut self, count: u64, range: Range<usize>) {
        self.count += count;
        self.range.start = cmp::min(self.range.start, range.start);
        self.range.end = cmp::max(self.range.end, range.end);
    }

    /// Merges the evidence from another info for the same barcode.
    pub fn merge(&mut self, other: &SimpleBarcodeInfo) {
        self.count += other.count;
        self.range.start = cmp::min(self.range.start, other.range.start);
        self.range.end = cmp::max(self.range.end, other.range.end);
    }
}

impl fmt::Display for SimpleBarcodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.count, self.range.start, self.range.end)
    }
}

impl FromStr for SimpleBarcodeInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let count = parse_token(tokens.next(), "read count")?;
        let start = parse_token(tokens.next(), "range start")?;
        let end = parse_token(tokens.next(), "range end")?;
        if tokens.next().is_some() {
            return Err(Error::MalformedSerialization(format!("trailing tokens in info: {}", s)));
        }
        Ok(SimpleBarcodeInfo::new(count, start..end))
    }
}

//-----------------------------------------------------------------------------

/// Framed per-barcode evidence: a read count and a packed coverage bitset.
///
/// The edge is divided into frames of fixed width; frame `i` covers positions
/// `[i * frame_size, (i + 1) * frame_size)`. Bit `i` is set when at least one
/// read carrying the barcode fell in frame `i`. `leftmost` and `rightmost`
/// are the extreme covered frames; before the first update they hold the
/// sentinel values `frames` and `0`.
///
/// # Examples
///
/// ```
/// use barcode_index::FrameBarcodeInfo;
///
/// let mut info = FrameBarcodeInfo::new(11);
/// info.update(3, 0, 2);
/// info.update(2, 4, 5);
///
/// assert_eq!(info.count(), 5);
/// assert_eq!(info.leftmost(), 0);
/// assert_eq!(info.rightmost(), 5);
/// assert!(info.frame(1));
/// assert!(!info.frame(3));
/// assert_eq!(info.covered(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBarcodeInfo {
    count: u64,
    is_on: RawVector,
    leftmost: usize,
    rightmost: usize,
}

impl FrameBarcodeInfo {
    /// Creates an empty info covering the given number of frames.
    pub fn new(frames: usize) -> Self {
        FrameBarcodeInfo {
            count: 0,
            is_on: RawVector::with_len(frames, false),
            leftmost: frames,
            rightmost: 0,
        }
    }

    /// Returns the number of reads recorded for the barcode.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the number of frames in the bitset.
    #[inline]
    pub fn frames(&self) -> usize {
        self.is_on.len()
    }

    /// Returns the lowest covered frame, or the number of frames if no frame
    /// is covered.
    #[inline]
    pub fn leftmost(&self) -> usize {
        self.leftmost
    }

    /// Returns the highest covered frame, or `0` if no frame is covered.
    #[inline]
    pub fn rightmost(&self) -> usize {
        self.rightmost
    }

    /// Returns `true` if frame `frame` is covered.
    ///
    /// # Panics
    ///
    /// May panic if `frame >= self.frames()`.
    #[inline]
    pub fn frame(&self, frame: usize) -> bool {
        self.is_on.bit(frame)
    }

    /// Returns the number of covered frames.
    #[inline]
    pub fn covered(&self) -> usize {
        self.is_on.count_ones()
    }

    /// Adds `count` reads covering frames `left_frame..=right_frame`.
    ///
    /// # Panics
    ///
    /// May panic if `right_frame >= self.frames()`.
    pub fn update(&mut self, count: u64, left_frame: usize, right_frame: usize) {
        self.count += count;
        for frame in left_frame..=right_frame {
            self.is_on.set_bit(frame, true);
        }
        self.leftmost = cmp::min(self.leftmost, left_frame);
        self.rightmost = cmp::max(self.rightmost, right_frame);
    }

    /// Merges the evidence from another info for the same barcode.
    ///
    /// The bitsets must have the same width; frames beyond the shorter bitset
    /// are ignored.
    pub fn merge(&mut self, other: &FrameBarcodeInfo) {
        self.count += other.count;
        let frames = cmp::min(self.is_on.len(), other.is_on.len());
        for frame in 0..frames {
            if other.is_on.bit(frame) {
                self.is_on.set_bit(frame, true);
            }
        }
        self.leftmost = cmp::min(self.leftmost, other.leftmost);
        self.rightmost = cmp::max(self.rightmost, other.rightmost);
    }
}

impl fmt::Display for FrameBarcodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.count)?;
        for frame in (0..self.is_on.len()).rev() {
            let bit = if self.is_on.bit(frame) { '1' } else { '0' };
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

impl FromStr for FrameBarcodeInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let count = parse_token(tokens.next(), "read count")?;
        let bits = tokens.next().ok_or_else(|| Error::MalformedSerialization("missing coverage bitset".to_string()))?;
        if tokens.next().is_some() {
            return Err(Error::MalformedSerialization(format!("trailing tokens in info: {}", s)));
        }

        let frames = bits.len();
        let mut info = FrameBarcodeInfo::new(frames);
        info.count = count;
        for (offset, value) in bits.chars().enumerate() {
            // The serialized form has the highest frame first.
            let frame = frames - 1 - offset;
            match value {
                '0' => (),
                '1' => {
                    info.is_on.set_bit(frame, true);
                    info.leftmost = cmp::min(info.leftmost, frame);
                    info.rightmost = cmp::max(info.rightmost, frame);
                },
                _ => {
                    return Err(Error::MalformedSerialization(format!("invalid coverage bitset: {}", bits)));
                },
            }
        }
        Ok(info)
    }
}

//-----------------------------------------------------------------------------

/// The operations the barcode index requires from a per-edge entry.
///
/// An entry is an ordered mapping from barcode identifiers to per-barcode
/// evidence. The two implementations are [`SimpleEdgeEntry`] and
/// [`FrameEdgeEntry`]; the index is parameterized by the entry type, so the
/// choice between them is made statically.
pub trait BarcodeEntry: Sized {
    /// The per-barcode evidence stored in the entry.
    type Info: fmt::Display + FromStr<Err = Error>;

    /// Creates an empty entry for the given edge.
    ///
    /// `frame_size` is the frame width in nucleotides; the simple entry
    /// ignores it along with the edge length.
    fn new(edge: EdgeId, edge_length: usize, frame_size: usize) -> Self;

    /// Returns the edge the entry belongs to.
    fn edge(&self) -> EdgeId;

    /// Returns the barcode distribution of the entry.
    fn distribution(&self) -> &BTreeMap<BarcodeId, Self::Info>;

    /// Records `count` reads carrying `barcode` over the given position
    /// range, creating the info on first sight of the barcode.
    fn insert_barcode(&mut self, barcode: BarcodeId, count: u64, range: Range<usize>);

    /// Merges an already-built info into the entry.
    fn insert_info(&mut self, barcode: BarcodeId, info: Self::Info);

    /// Removes barcodes with fewer than `trimming_threshold` reads and
    /// barcodes whose evidence starts more than `gap_threshold` nucleotides
    /// from the edge head.
    fn filter(&mut self, trimming_threshold: u64, gap_threshold: usize);

    /// Returns the number of distinct barcodes in the entry.
    fn len(&self) -> usize {
        self.distribution().len()
    }

    /// Returns `true` if the entry has no barcodes.
    fn is_empty(&self) -> bool {
        self.distribution().is_empty()
    }

    /// Returns `true` if the entry contains the given barcode.
    fn contains(&self, barcode: BarcodeId) -> bool {
        self.distribution().contains_key(&barcode)
    }

    /// Returns the info for the given barcode, or [`None`] if the barcode is
    /// not present.
    fn get(&self, barcode: BarcodeId) -> Option<&Self::Info> {
        self.distribution().get(&barcode)
    }

    /// Returns an iterator over the barcode identifiers in the entry, in
    /// identifier order.
    fn barcode_ids(&self) -> Keys<'_, BarcodeId, Self::Info> {
        self.distribution().keys()
    }

    /// Returns an iterator over `(barcode, info)` pairs in identifier order.
    fn iter(&self) -> Iter<'_, BarcodeId, Self::Info> {
        self.distribution().iter()
    }

    /// Returns the number of barcodes present in both entries.
    fn intersection_size(&self, other: &Self) -> usize {
        self.barcode_ids().filter(|barcode| other.contains(**barcode)).count()
    }

    /// Returns the number of barcodes present in either entry.
    fn union_size(&self, other: &Self) -> usize {
        self.len() + other.len() - self.intersection_size(other)
    }

    /// Writes the barcode distribution in the line-oriented text form.
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.len())?;
        for (barcode, info) in self.iter() {
            writeln!(writer, "{} {}", barcode, info)?;
        }
        Ok(())
    }

    /// Reads a barcode distribution and merges it into the entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSerialization`] on an unexpected token or an
    /// early end of stream.
    fn deserialize<R: BufRead>(&mut self, reader: &mut R) -> Result<(), Error> {
        let line = read_line(reader)?;
        let size: usize = parse_token(Some(line.as_str()), "barcode count")?;
        for _ in 0..size {
            let line = read_line(reader)?;
            let (barcode, info) = line
                .split_once(' ')
                .ok_or_else(|| Error::MalformedSerialization(format!("invalid entry line: {}", line)))?;
            let barcode: BarcodeId = parse_token(Some(barcode), "barcode id")?;
            let info: Self::Info = info.trim().parse()?;
            self.insert_info(barcode, info);
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------

/// A per-edge entry storing [`SimpleBarcodeInfo`] evidence.
///
/// # Examples
///
/// ```
/// use barcode_index::{BarcodeEntry, SimpleEdgeEntry};
///
/// let mut entry = SimpleEdgeEntry::new(0, 100, 0);
/// entry.insert_barcode(3, 2, 10..40);
/// entry.insert_barcode(3, 1, 5..20);
/// entry.insert_barcode(8, 4, 60..90);
///
/// assert_eq!(entry.len(), 2);
/// let info = entry.get(3).unwrap();
/// assert_eq!(info.count(), 3);
/// assert_eq!(info.range(), 5..40);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleEdgeEntry {
    edge: EdgeId,
    distribution: BTreeMap<BarcodeId, SimpleBarcodeInfo>,
}

impl BarcodeEntry for SimpleEdgeEntry {
    type Info = SimpleBarcodeInfo;

    fn new(edge: EdgeId, _: usize, _: usize) -> Self {
        SimpleEdgeEntry {
            edge: edge,
            distribution: BTreeMap::new(),
        }
    }

    #[inline]
    fn edge(&self) -> EdgeId {
        self.edge
    }

    #[inline]
    fn distribution(&self) -> &BTreeMap<BarcodeId, SimpleBarcodeInfo> {
        &self.distribution
    }

    fn insert_barcode(&mut self, barcode: BarcodeId, count: u64, range: Range<usize>) {
        match self.distribution.get_mut(&barcode) {
            Some(info) => info.update(count, range),
            None => {
                self.distribution.insert(barcode, SimpleBarcodeInfo::new(count, range));
            },
        }
    }

    fn insert_info(&mut self, barcode: BarcodeId, info: SimpleBarcodeInfo) {
        match self.distribution.get_mut(&barcode) {
            Some(existing) => existing.merge(&info),
            None => {
                self.distribution.insert(barcode, info);
            },
        }
    }

    fn filter(&mut self, trimming_threshold: u64, gap_threshold: usize) {
        self.distribution
            .retain(|_, info| info.count() >= trimming_threshold && info.range().start <= gap_threshold);
    }
}

//-----------------------------------------------------------------------------

/// A per-edge entry storing [`FrameBarcodeInfo`] evidence.
///
/// The entry owns the frame geometry of its edge: frames are
/// `edge_length / frame_size + 1` windows of `frame_size` nucleotides, the
/// extra frame absorbing the shorter remainder at the edge end. Position
/// ranges are translated to frame ranges on insertion.
///
/// # Examples
///
/// ```
/// use barcode_index::{BarcodeEntry, FrameEdgeEntry};
///
/// let mut entry = FrameEdgeEntry::new(0, 100, 10);
/// assert_eq!(entry.number_of_frames(), 11);
///
/// entry.insert_barcode(7, 3, 5..25);
/// entry.insert_barcode(7, 2, 40..55);
/// let info = entry.get(7).unwrap();
/// assert_eq!(info.count(), 5);
/// assert_eq!(info.leftmost(), 0);
/// assert_eq!(info.rightmost(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameEdgeEntry {
    edge: EdgeId,
    frame_size: usize,
    number_of_frames: usize,
    distribution: BTreeMap<BarcodeId, FrameBarcodeInfo>,
}

impl FrameEdgeEntry {
    /// Returns the frame width in nucleotides.
    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Returns the number of frames on the edge.
    #[inline]
    pub fn number_of_frames(&self) -> usize {
        self.number_of_frames
    }
}

impl BarcodeEntry for FrameEdgeEntry {
    type Info = FrameBarcodeInfo;

    fn new(edge: EdgeId, edge_length: usize, frame_size: usize) -> Self {
        FrameEdgeEntry {
            edge: edge,
            frame_size: frame_size,
            number_of_frames: edge_length / frame_size + 1,
            distribution: BTreeMap::new(),
        }
    }

    #[inline]
    fn edge(&self) -> EdgeId {
        self.edge
    }

    #[inline]
    fn distribution(&self) -> &BTreeMap<BarcodeId, FrameBarcodeInfo> {
        &self.distribution
    }

    fn insert_barcode(&mut self, barcode: BarcodeId, count: u64, range: Range<usize>) {
        let left_frame = range.start / self.frame_size;
        let right_frame = range.end / self.frame_size;
        let frames = self.number_of_frames;
        let info = self.distribution.entry(barcode).or_insert_with(|| FrameBarcodeInfo::new(frames));
        info.update(count, left_frame, right_frame);
    }

    fn insert_info(&mut self, barcode: BarcodeId, info: FrameBarcodeInfo) {
        match self.distribution.get_mut(&barcode) {
            Some(existing) => existing.merge(&info),
            None => {
                self.distribution.insert(barcode, info);
            },
        }
    }

    fn filter(&mut self, trimming_threshold: u64, gap_threshold: usize) {
        let gap_frame = gap_threshold / self.frame_size;
        self.distribution
            .retain(|_, info| info.count() >= trimming_threshold && info.leftmost() <= gap_frame);
    }
}

//-----------------------------------------------------------------------------
