use std::{
    collections::HashMap,
    fmt::{self, Debug},
    fs,
    hash::Hash,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use catcher_rendering::{FontKey, SpriteKey};
use log::info;
use macroquad::{
    text::{load_ttf_font_from_bytes, Font},
    texture::{FilterMode, Texture2D},
};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Image and font locations resolved from the asset manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ManifestEntries {
    images: Vec<(SpriteKey, PathBuf)>,
    fonts: Vec<(FontKey, FontSource)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FontSource {
    path: PathBuf,
    size: u16,
}

/// Assets read and validated before a graphics context exists.
///
/// Images are decoded up front so corrupt files stop start-up before the
/// window opens, and so their natural sizes can shape the simulation.
#[derive(Debug)]
pub struct AssetBundle {
    images: Vec<(SpriteKey, DecodedImage)>,
    fonts: Vec<(FontKey, FontBytes)>,
}

#[derive(Clone, PartialEq, Eq)]
struct DecodedImage {
    width: u16,
    height: u16,
    rgba: Vec<u8>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecodedImage({}x{})", self.width, self.height)
    }
}

#[derive(Debug)]
struct FontBytes {
    bytes: Vec<u8>,
    size: u16,
}

impl AssetBundle {
    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Reads every asset listed in the manifest at `manifest_path`.
    pub fn read(manifest_path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read asset manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        let bundle = Self::from_entries(entries, |path| {
            fs::read(path).with_context(|| format!("failed to read asset at {}", path.display()))
        })?;
        info!(
            "read {} images and {} fonts from {}",
            bundle.images.len(),
            bundle.fonts.len(),
            manifest_path.display()
        );
        Ok(bundle)
    }

    fn from_entries(
        entries: ManifestEntries,
        mut reader: impl FnMut(&Path) -> Result<Vec<u8>>,
    ) -> Result<Self> {
        let mut images = Vec::with_capacity(entries.images.len());
        for (key, path) in entries.images {
            let image = reader(&path)
                .and_then(|bytes| decode_image(&bytes))
                .with_context(|| format!("failed to load image for {key:?}"))?;
            images.push((key, image));
        }

        let mut fonts = Vec::with_capacity(entries.fonts.len());
        for (key, source) in entries.fonts {
            let bytes = reader(&source.path)
                .with_context(|| format!("failed to load font for {key:?}"))?;
            fonts.push((
                key,
                FontBytes {
                    bytes,
                    size: source.size,
                },
            ));
        }

        Ok(Self { images, fonts })
    }

    /// Natural width and height in pixels of the image registered for `key`.
    #[must_use]
    pub fn image_size(&self, key: SpriteKey) -> Option<(u32, u32)> {
        self.images
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, image)| (u32::from(image.width), u32::from(image.height)))
    }
}

fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let image = image::load_from_memory(bytes)
        .context("image data could not be decoded")?
        .to_rgba8();
    let (width, height) = image.dimensions();
    let width = u16::try_from(width)
        .with_context(|| format!("image width {width} exceeds {}", u16::MAX))?;
    let height = u16::try_from(height)
        .with_context(|| format!("image height {height} exceeds {}", u16::MAX))?;

    Ok(DecodedImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Keyed store of decoded assets; every key is loaded exactly once.
#[derive(Debug)]
pub(crate) struct AssetCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> AssetCache<K, V>
where
    K: Copy + Debug + Eq + Hash,
{
    fn load<S>(sources: Vec<(K, S)>, mut loader: impl FnMut(K, S) -> Result<V>) -> Result<Self> {
        let mut entries = HashMap::with_capacity(sources.len());
        for (key, source) in sources {
            let value = loader(key, source).with_context(|| format!("failed to decode {key:?}"))?;
            if entries.insert(key, value).is_some() {
                bail!("duplicate asset entry for {key:?}");
            }
        }
        Ok(Self { entries })
    }

    fn get(&self, key: K) -> Result<&V> {
        self.entries
            .get(&key)
            .with_context(|| format!("asset {key:?} was not loaded"))
    }
}

/// Font face decoded from TTF bytes together with the size it is drawn at.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LoadedFont {
    pub(crate) font: Font,
    pub(crate) size: u16,
}

/// Textures and fonts uploaded to the graphics context.
#[derive(Debug)]
pub(crate) struct Assets {
    images: AssetCache<SpriteKey, Texture2D>,
    fonts: AssetCache<FontKey, LoadedFont>,
}

impl Assets {
    /// Decodes the bundle into GPU textures and fonts. Requires an open window.
    pub(crate) fn upload(bundle: AssetBundle) -> Result<Self> {
        let images = AssetCache::load(bundle.images, |_, image| {
            let texture = Texture2D::from_rgba8(image.width, image.height, &image.rgba);
            texture.set_filter(FilterMode::Linear);
            Ok(texture)
        })?;
        let fonts = AssetCache::load(bundle.fonts, |key, source| {
            let font = load_ttf_font_from_bytes(&source.bytes)
                .map_err(|error| anyhow!("font {key:?} is not a valid TTF file: {error:?}"))?;
            Ok(LoadedFont {
                font,
                size: source.size,
            })
        })?;
        info!("uploaded sprite textures and fonts");
        Ok(Self { images, fonts })
    }

    /// Texture registered for `key`.
    pub(crate) fn texture(&self, key: SpriteKey) -> Result<Texture2D> {
        self.images.get(key).copied()
    }

    /// Font registered for `key`.
    pub(crate) fn font(&self, key: FontKey) -> Result<LoadedFont> {
        self.fonts.get(key).copied()
    }
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    images: HashMap<String, String>,
    fonts: HashMap<String, FontManifestEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct FontManifestEntry {
    path: String,
    size: u16,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<ManifestEntries> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let images = resolve_section(
        "image",
        manifest.images,
        &SpriteKey::ALL,
        parse_sprite_key,
        |relative| Ok(base_path.join(relative)),
    )?;
    let fonts = resolve_section(
        "font",
        manifest.fonts,
        &FontKey::ALL,
        parse_font_key,
        |entry| {
            if entry.size == 0 {
                bail!("font size must be positive");
            }
            Ok(FontSource {
                path: base_path.join(entry.path),
                size: entry.size,
            })
        },
    )?;

    Ok(ManifestEntries { images, fonts })
}

fn resolve_section<K, E, V>(
    section: &str,
    raw: HashMap<String, E>,
    required: &[K],
    parse_key: impl Fn(&str) -> Result<K>,
    mut resolve: impl FnMut(E) -> Result<V>,
) -> Result<Vec<(K, V)>>
where
    K: Copy + Debug + Eq + Hash,
{
    let mut resolved = HashMap::with_capacity(raw.len());
    for (name, entry) in raw {
        let key = parse_key(&name)
            .with_context(|| format!("unknown {section} key `{name}` in manifest"))?;
        let value = resolve(entry).with_context(|| format!("invalid {section} entry {key:?}"))?;
        if resolved.insert(key, value).is_some() {
            bail!("asset manifest contains duplicate {section} entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(required.len());
    for key in required {
        let Some(value) = resolved.remove(key) else {
            bail!("asset manifest missing {section} entry for {key:?}");
        };
        ordered.push((*key, value));
    }

    Ok(ordered)
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match name {
        "Player" => Ok(SpriteKey::Player),
        "FallingObject" => Ok(SpriteKey::FallingObject),
        "HealthIcon" => Ok(SpriteKey::HealthIcon),
        _ => bail!("unknown sprite key `{name}`"),
    }
}

fn parse_font_key(name: &str) -> Result<FontKey> {
    match name {
        "Score" => Ok(FontKey::Score),
        "Health" => Ok(FontKey::Health),
        _ => bail!("unknown font key `{name}`"),
    }
}
