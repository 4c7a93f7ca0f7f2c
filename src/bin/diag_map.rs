/// Diagnostic tool: decodes .map files and reports what the reader finds.
///
/// Usage:
///     cargo run --bin diag_map -- <path_to_tab_or_map>
///     cargo run --bin diag_map -- data/            (reads all .map files in dir)
///     cargo run --bin diag_map -- --polylines --extended <path>
///
/// Set RUST_LOG=debug for per-block tracing.

use anyhow::{bail, Context, Result};
use mapinfo_map::io::map::{
    BlockKind, GeometryKind, MapFile, MapFileReader, MapReaderConfiguration,
};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let mut config = MapReaderConfiguration::default();
    let mut paths = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--polylines" => config.append_polylines = true,
            "--extended" => config.decode_extended_kinds = true,
            _ => paths.push(PathBuf::from(arg)),
        }
    }
    if paths.is_empty() {
        bail!("Usage: diag_map [--polylines] [--extended] <path_to_tab_map_or_directory>");
    }

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = fs::read_dir(&path)
                .with_context(|| format!("failed to read directory {}", path.display()))?;
            let mut found: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| {
                    p.extension()
                        .map(|e| e.eq_ignore_ascii_case("map"))
                        .unwrap_or(false)
                })
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path);
        }
    }

    println!("mapinfo-map .MAP diagnostic ({} files)", files.len());
    println!();

    let mut success = 0;
    let mut failed = 0;
    for file in &files {
        match diagnose(file, &config) {
            Ok(()) => success += 1,
            Err(e) => {
                println!("  FAILED: {e:#}");
                failed += 1;
            }
        }
        println!();
    }

    println!(
        "Results: {} succeeded, {} failed out of {} total",
        success,
        failed,
        files.len()
    );
    Ok(())
}

fn open(path: &Path, config: &MapReaderConfiguration) -> Result<MapFile> {
    let is_map = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("map"))
        .unwrap_or(false);
    let reader = if is_map {
        MapFileReader::from_file(path)?
    } else {
        MapFileReader::open(path)?
    };
    Ok(reader.with_config(config.clone()).read()?)
}

fn diagnose(path: &Path, config: &MapReaderConfiguration) -> Result<()> {
    println!("{}", path.display());
    let map = open(path, config).with_context(|| format!("decoding {}", path.display()))?;

    match map.header() {
        Some(header) => {
            println!(
                "  version {}  block size {}  precision {}  quadrant {}",
                header.version,
                header.block_size,
                header.coord_precision,
                header.coord_origin_quadrant
            );
            println!("  bounds {}", header.bounds);
            if let Some(extent) = header.bounds_coordsys() {
                println!("  extent {extent}");
            }
            println!(
                "  objects: {} points, {} lines, {} regions, {} texts",
                header.num_point_objects,
                header.num_line_objects,
                header.num_region_objects,
                header.num_text_objects
            );
            if let Some(affine) = &header.projection.affine {
                println!("  affine {:?}", affine.params);
            }
        }
        None => println!("  no geometry"),
    }

    let pages: Vec<String> = BlockKind::ALL
        .iter()
        .filter(|kind| map.page_count(**kind) > 0)
        .map(|kind| format!("{} {}", map.page_count(*kind), kind))
        .collect();
    println!("  pages: {}", pages.join(", "));

    if let Some(index) = map.index() {
        println!("  index: {} entries on {} pages", index.num_entries(), index.page_count());
    }

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for record in map.records() {
        let name = record.kind().map_or("unknown", GeometryKind::name);
        *kinds.entry(name).or_default() += 1;
    }
    if let Some(objects) = map.objects() {
        println!(
            "  records: {} on {} pages ({} polylines withheld)",
            objects.num_records(),
            objects.page_count(),
            objects.withheld_polylines()
        );
        for (name, count) in &kinds {
            println!("    {name:<20} {count}");
        }
    }

    for notification in map.notifications() {
        println!("  {notification}");
    }
    Ok(())
}
