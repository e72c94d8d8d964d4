//! Build script for vitrine-assets
//!
//! - Reads assets.toml
//! - Embeds every file under the image directory into the catalog store
//! - Checks raw file names against the argument grammar at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use vitrine_catalog::limits::MAX_PATH_LENGTH;
use vitrine_catalog::{extract_args, inspect_asset, CatalogEntry, CatalogStore, FileKind};
use walkdir::WalkDir;

/// Asset embedding configuration
struct AssetConfig {
    /// Image directory, relative to the crate
    source_dir: String,
    /// Name prefix inside the store
    mount: String,
    /// `Server:` value in every payload header
    server: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            source_dir: "images".to_string(),
            mount: "/images".to_string(),
            server: "vitrine".to_string(),
        }
    }
}

/// One file to embed
struct Asset {
    /// Catalog name, e.g. `/images/logo.png`
    name: String,
    /// File on disk
    source: PathBuf,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let config = load_config();
    let assets = collect_assets(&config);
    check_assets(&assets);
    write_catalog(&config, &assets);
}

/// Read assets.toml, falling back to defaults when it is missing
fn load_config() -> AssetConfig {
    println!("cargo:rerun-if-changed=assets.toml");

    let config_path = Path::new("assets.toml");
    if !config_path.exists() {
        println!("cargo:warning=assets.toml not found, embedding images/ as /images");
        return AssetConfig::default();
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read assets.toml", &[e.to_string()]),
    };

    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in assets.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut config = AssetConfig::default();
    let mut errors = Vec::new();

    for (section, key, target) in [
        ("catalog", "source_dir", &mut config.source_dir),
        ("catalog", "mount", &mut config.mount),
        ("header", "server", &mut config.server),
    ] {
        match value.get(section).and_then(|s| s.get(key)) {
            Some(toml::Value::String(s)) => *target = s.clone(),
            Some(_) => errors.push(format!("[{}] {} must be a string", section, key)),
            None => {}
        }
    }

    if !config.mount.is_empty() && !config.mount.starts_with('/') {
        errors.push("[catalog] mount must start with '/'".to_string());
    }

    if !errors.is_empty() {
        fail("Invalid asset configuration", &errors);
    }
    config
}

/// Walk the image directory in a stable order
fn collect_assets(config: &AssetConfig) -> Vec<Asset> {
    let root = Path::new(&config.source_dir);
    println!("cargo:rerun-if-changed={}", root.display());

    if !root.is_dir() {
        println!(
            "cargo:warning=image directory '{}' not found, catalog is empty",
            root.display()
        );
        return Vec::new();
    }

    let mount = config.mount.trim_end_matches('/');
    let mut assets = Vec::new();
    let mut errors = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                errors.push(e.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let mut name = mount.to_string();
        let mut utf8 = true;
        for component in relative.components() {
            match component.as_os_str().to_str() {
                Some(part) => {
                    name.push('/');
                    name.push_str(part);
                }
                None => utf8 = false,
            }
        }

        if !utf8 {
            errors.push(format!("{} is not valid UTF-8", entry.path().display()));
        } else if name.len() > MAX_PATH_LENGTH {
            errors.push(format!("{} exceeds {} bytes", name, MAX_PATH_LENGTH));
        } else {
            assets.push(Asset {
                name,
                source: entry.path().to_path_buf(),
            });
        }
    }

    if !errors.is_empty() {
        fail("Cannot embed images", &errors);
    }
    assets
}

/// Warn about files the runtime catalog will exclude
fn check_assets(assets: &[Asset]) {
    let entries: Vec<CatalogEntry<'_>> = assets
        .iter()
        .map(|asset| CatalogEntry::new(&asset.name, &[]))
        .collect();
    let store = CatalogStore::new(&entries);

    for entry in store.iter() {
        let name = entry.name();
        let kind = FileKind::of(name);
        if kind == FileKind::Other {
            continue;
        }
        if kind == FileKind::Raw {
            if let Err(e) = extract_args(name) {
                println!("cargo:warning={}: {}", name, e);
                continue;
            }
        }

        let report = inspect_asset(&store, name);
        let listed = match kind {
            FileKind::Preview(preview) => report.kind() == Some(preview),
            _ => report.is_valid(),
        };
        if !listed {
            println!(
                "cargo:warning={} will not be listed (preview: {}, raw files: {}, \
                 animated: {}, arguments valid: {}, unique frames: {})",
                name,
                report.preview_found || report.animation_preview_found,
                report.raw_count,
                report.animated,
                report.args_valid,
                report.frames_unique
            );
        }
    }
}

/// Write every payload to OUT_DIR and generate the entry table
fn write_catalog(config: &AssetConfig, assets: &[Asset]) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let blob_dir = out_dir.join("blobs");
    fs::create_dir_all(&blob_dir).unwrap();

    let mut table = String::new();
    table.push_str("/// Every embedded file, in directory order\n");
    table.push_str(&format!(
        "pub static ENTRIES: [CatalogEntry<'static>; {}] = [\n",
        assets.len()
    ));

    for (i, asset) in assets.iter().enumerate() {
        let content = fs::read(&asset.source).unwrap_or_else(|e| {
            fail(
                "Failed to read image",
                &[format!("{}: {}", asset.source.display(), e)],
            )
        });

        let blob_path = blob_dir.join(format!("{}.bin", i));
        let mut blob = File::create(&blob_path).unwrap();
        write!(
            blob,
            "HTTP/1.0 200 OK\r\nServer: {}\r\nContent-Type: {}\r\n\r\n",
            config.server,
            content_type(&asset.name)
        )
        .unwrap();
        blob.write_all(&content).unwrap();

        table.push_str(&format!(
            "    CatalogEntry::new({:?}, include_bytes!({:?})),\n",
            asset.name,
            blob_path.display().to_string()
        ));
    }
    table.push_str("];\n");

    fs::write(out_dir.join("catalog.rs"), table).unwrap();
}

/// MIME type served for a catalog name
fn content_type(name: &str) -> &'static str {
    let extension = vitrine_catalog::split(name).extension.to_ascii_lowercase();
    match extension.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "html" | "htm" => "text/html",
        "js" => "application/javascript",
        "css" => "text/css",
        _ => "application/octet-stream",
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| format!("║  • {:<62} ║", line))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
