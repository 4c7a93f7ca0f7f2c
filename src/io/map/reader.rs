//! .MAP reader orchestrator, the entry point for decoding a `.map` file.
//!
//! Reads the file one 512-byte page at a time and routes each page by file
//! position and leading byte: page 0 is the header, page 1 is the header
//! continuation for version 500 files, and every later page goes to the
//! index or object block its kind names. Coordinate, garbage and tool pages
//! are consumed and counted but not stored.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mapinfo_map::io::map::MapFileReader;
//!
//! let map = MapFileReader::open("roads.tab")?.read()?;
//! if let Some(objects) = map.objects() {
//!     println!("{} records", objects.num_records());
//! }
//! # Ok::<(), mapinfo_map::error::MapError>(())
//! ```

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use crate::error::{MapError, Result};
use crate::notification::{NotificationCollection, NotificationType};

use super::block_type::BlockKind;
use super::constants::PAGE_SIZE;
use super::header_block::FileHeader;
use super::index_block::IndexBlock;
use super::object_block::{GeometryRecord, ObjectBlock};
use super::page::Page;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration options for the `.map` reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapReaderConfiguration {
    /// When `true`, decoded polyline records are kept in the object block.
    ///
    /// Default: `false`, polylines are decoded and dropped.
    pub append_polylines: bool,

    /// When `true`, arc, region, text, rectangle, rounded rectangle and
    /// ellipse records are decoded. Otherwise they fail with
    /// `UnsupportedGeometryKind`.
    pub decode_extended_kinds: bool,
}

// ---------------------------------------------------------------------------
// Scan state
// ---------------------------------------------------------------------------

/// Position of the page scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Next page is page 0.
    ExpectHeader,
    /// Next page is page 1 of a version 500 file.
    ExpectHeaderContinuation,
    /// Next page is routed by its leading byte.
    ExpectAnyBlock,
    EndOfStream,
}

impl ScanState {
    /// State after one full page has been consumed in this state.
    pub fn advance(self, header: Option<&FileHeader>) -> Self {
        match self {
            ScanState::ExpectHeader => {
                if header.is_some_and(FileHeader::has_continuation_page) {
                    ScanState::ExpectHeaderContinuation
                } else {
                    ScanState::ExpectAnyBlock
                }
            }
            ScanState::ExpectHeaderContinuation | ScanState::ExpectAnyBlock => {
                ScanState::ExpectAnyBlock
            }
            ScanState::EndOfStream => ScanState::EndOfStream,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoded file
// ---------------------------------------------------------------------------

/// Everything decoded from one `.map` file.
#[derive(Debug, Clone, Default)]
pub struct MapFile {
    path: Option<PathBuf>,
    header: Option<FileHeader>,
    index: Option<IndexBlock>,
    objects: Option<ObjectBlock>,
    page_counts: HashMap<BlockKind, usize>,
    /// Bytes read for page 0 when the stream ended before it was complete.
    short_header: Option<usize>,
    notifications: NotificationCollection,
}

impl MapFile {
    /// Path of the `.map` file, `None` when decoded from a bare stream.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn header(&self) -> Option<&FileHeader> {
        self.header.as_ref()
    }

    pub fn index(&self) -> Option<&IndexBlock> {
        self.index.as_ref()
    }

    pub fn objects(&self) -> Option<&ObjectBlock> {
        self.objects.as_ref()
    }

    /// Decoded geometry records, empty when there is no object block.
    pub fn records(&self) -> &[GeometryRecord] {
        match &self.objects {
            Some(objects) => objects.records(),
            None => &[],
        }
    }

    /// Whether a header was decoded. `false` when the `.map` sibling is
    /// missing, empty or shorter than one page.
    pub fn is_geometry_available(&self) -> bool {
        self.header.is_some()
    }

    /// The header when geometry is available.
    ///
    /// Fails with `TruncatedPage` at offset 0 when the file ended before
    /// page 0 was complete, and with `MissingOptionalFile` when there was no
    /// `.map` sibling to read.
    pub fn require_geometry(&self) -> Result<&FileHeader> {
        if let Some(header) = &self.header {
            return Ok(header);
        }
        match self.short_header {
            Some(available) => Err(MapError::TruncatedPage {
                offset: 0,
                needed: PAGE_SIZE,
                available,
            }),
            None => Err(MapError::MissingOptionalFile(
                self.path.clone().unwrap_or_default(),
            )),
        }
    }

    /// Number of full pages of the given kind. The header continuation page
    /// counts as a header page.
    pub fn page_count(&self, kind: BlockKind) -> usize {
        self.page_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_pages(&self) -> usize {
        self.page_counts.values().sum()
    }

    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }
}

// ---------------------------------------------------------------------------
// MapFileReader
// ---------------------------------------------------------------------------

/// `.map` file reader, producing a [`MapFile`].
///
/// The reader owns its stream; [`read`](Self::read) consumes the reader, so
/// the stream is closed on every return path.
pub struct MapFileReader<R: Read> {
    /// Underlying byte stream, `None` when the `.map` sibling is missing.
    reader: Option<R>,
    path: Option<PathBuf>,
    config: MapReaderConfiguration,
    notifications: NotificationCollection,
}

impl MapFileReader<BufReader<File>> {
    /// Open the `.map` sibling of a `.tab` dataset.
    ///
    /// A missing `.map` file is not an error: the returned reader decodes to
    /// a [`MapFile`] without geometry.
    pub fn open<P: AsRef<Path>>(tab_path: P) -> Result<Self> {
        let map_path = map_path_for(tab_path.as_ref())?;
        match File::open(&map_path) {
            Ok(file) => {
                info!("opening {}", map_path.display());
                Ok(Self::with_stream(Some(BufReader::new(file)), Some(map_path)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("{} not found, geometry unavailable", map_path.display());
                let mut reader = Self::with_stream(None, Some(map_path.clone()));
                reader.notifications.notify(
                    NotificationType::Warning,
                    format!("{} not found, geometry unavailable", map_path.display()),
                );
                Ok(reader)
            }
            Err(e) => Err(MapError::Io(e)),
        }
    }

    /// Open a `.map` file directly. A missing file is an I/O error here.
    pub fn from_file<P: AsRef<Path>>(map_path: P) -> Result<Self> {
        let path = map_path.as_ref();
        let file = File::open(path)?;
        info!("opening {}", path.display());
        Ok(Self::with_stream(
            Some(BufReader::new(file)),
            Some(path.to_path_buf()),
        ))
    }
}

impl<R: Read> MapFileReader<R> {
    /// Create a reader over any byte stream positioned at page 0.
    pub fn from_reader(reader: R) -> Self {
        Self::with_stream(Some(reader), None)
    }

    fn with_stream(reader: Option<R>, path: Option<PathBuf>) -> Self {
        Self {
            reader,
            path,
            config: MapReaderConfiguration::default(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Set configuration options.
    pub fn with_config(mut self, config: MapReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MapReaderConfiguration {
        &self.config
    }

    /// Decode the whole file.
    ///
    /// A short or empty trailing page ends the scan. Any other failure
    /// aborts the read with a [`MapError::PageDecode`] naming the page.
    pub fn read(mut self) -> Result<MapFile> {
        let mut map = MapFile {
            path: self.path.take(),
            ..MapFile::default()
        };
        let Some(mut reader) = self.reader.take() else {
            map.notifications = self.notifications;
            return Ok(map);
        };

        let mut state = ScanState::ExpectHeader;
        let mut offset: u64 = 0;
        let mut buf = [0u8; PAGE_SIZE];
        let mut page = Page::load(buf);

        while state != ScanState::EndOfStream {
            let filled = fill_page(&mut reader, &mut buf)
                .map_err(|e| MapError::at_page(offset, e.into()))?;
            if state == ScanState::ExpectHeader && filled < PAGE_SIZE {
                warn!("no header page: stream ended after {filled} bytes");
                self.notifications.notify_at(
                    NotificationType::Warning,
                    offset,
                    format!("no header page, file holds only {filled} bytes"),
                );
                map.short_header = Some(filled);
                state = ScanState::EndOfStream;
                continue;
            }
            if filled == 0 {
                state = ScanState::EndOfStream;
                continue;
            }
            if filled < PAGE_SIZE {
                warn!("short trailing page at {offset:#X}: {filled} bytes");
                self.notifications.notify_at(
                    NotificationType::Warning,
                    offset,
                    format!("short trailing page of {filled} bytes ignored"),
                );
                state = ScanState::EndOfStream;
                continue;
            }

            page.reload(buf);
            self.decode_page(state, &page, offset, &mut map)
                .map_err(|e| MapError::at_page(offset, e))?;
            state = state.advance(map.header.as_ref());
            offset += PAGE_SIZE as u64;
        }

        info!(
            "decoded {} pages: {} index entries, {} object records",
            map.total_pages(),
            map.index.as_ref().map_or(0, IndexBlock::num_entries),
            map.records().len()
        );
        map.notifications = self.notifications;
        Ok(map)
    }

    fn decode_page(
        &mut self,
        state: ScanState,
        page: &Page,
        offset: u64,
        map: &mut MapFile,
    ) -> Result<()> {
        match state {
            ScanState::ExpectHeader => {
                map.header = Some(FileHeader::decode(page, None)?);
                *map.page_counts.entry(BlockKind::Header).or_default() += 1;
            }
            ScanState::ExpectHeaderContinuation => {
                if let Some(header) = map.header.as_mut() {
                    header.apply_continuation(page)?;
                }
                *map.page_counts.entry(BlockKind::Header).or_default() += 1;
            }
            ScanState::ExpectAnyBlock => {
                let kind = page.peek_block_kind();
                *map.page_counts.entry(kind).or_default() += 1;
                self.route_block(kind, page, offset, map)?;
            }
            ScanState::EndOfStream => {}
        }
        Ok(())
    }

    fn route_block(
        &mut self,
        kind: BlockKind,
        page: &Page,
        offset: u64,
        map: &mut MapFile,
    ) -> Result<()> {
        trace!("page {offset:#X}: {kind}");
        match kind {
            BlockKind::Index => match map.index.as_mut() {
                Some(index) => index.append(page)?,
                None => map.index = Some(IndexBlock::decode(page)?),
            },
            BlockKind::Object => {
                let objects = map.objects.get_or_insert_with(ObjectBlock::new);
                objects.append_with(page, &self.config)?;
                let withheld = objects
                    .pages()
                    .last()
                    .map_or(0, |p| p.withheld_polylines);
                if withheld > 0 {
                    self.notifications.notify_at(
                        NotificationType::NotSupported,
                        offset,
                        format!("{withheld} polyline records decoded but not appended"),
                    );
                }
            }
            BlockKind::Coord | BlockKind::Garbage | BlockKind::Tool => {
                debug!("discarding {kind} page at {offset:#X}");
                self.notifications.notify_at(
                    NotificationType::NotImplemented,
                    offset,
                    format!("{kind} page discarded"),
                );
            }
            BlockKind::Header | BlockKind::RawUnknown => {
                warn!("discarding unexpected {kind} page at {offset:#X}");
                self.notifications.notify_at(
                    NotificationType::Warning,
                    offset,
                    format!(
                        "unexpected {kind} page discarded (leading byte {:#04X})",
                        page.as_bytes()[0]
                    ),
                );
            }
        }
        Ok(())
    }
}

/// Fill `buf` from the stream. Returns the number of bytes read, short only
/// at end of stream.
fn fill_page<R: Read>(reader: &mut R, buf: &mut [u8; PAGE_SIZE]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < PAGE_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Path of the `.map` file that belongs to a `.tab` dataset.
///
/// The extension is swapped keeping its case (`.TAB` gives `.MAP`). When
/// that file does not exist but the other case does, the other case wins.
pub fn map_path_for(tab_path: &Path) -> Result<PathBuf> {
    let extension = tab_path
        .extension()
        .and_then(OsStr::to_str)
        .ok_or_else(|| MapError::InvalidPath(format!("{} has no extension", tab_path.display())))?;

    let (preferred, other) = if extension.chars().any(|c| c.is_ascii_uppercase()) {
        ("MAP", "map")
    } else {
        ("map", "MAP")
    };
    let preferred = tab_path.with_extension(preferred);
    if preferred.exists() {
        return Ok(preferred);
    }
    let other = tab_path.with_extension(other);
    if other.exists() {
        return Ok(other);
    }
    Ok(preferred)
}
