use std::collections::BTreeMap;

use crate::colorspace::ColorSpace;
use crate::config::AppConfig;
use crate::error::{ColorError, ColorResult};

/// Named color spaces, looked up case-insensitively by key or alias
#[derive(Clone, Debug)]
pub struct Catalog {
    spaces: BTreeMap<String, ColorSpace>,
    aliases: BTreeMap<String, String>,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['_', ' ', '.'], "-")
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        let mut res = Self {
            spaces: BTreeMap::new(),
            aliases: BTreeMap::new(),
        };

        res.insert("srgb", ColorSpace::srgb());
        res.insert("rec709", ColorSpace::rec709());
        res.insert("rec2020", ColorSpace::rec2020());
        res.insert("display-p3", ColorSpace::display_p3());
        res.insert("dci-p3", ColorSpace::dci_p3());
        res.insert("adobe-rgb", ColorSpace::adobe_rgb());

        for (alias, key) in [
            ("bt709", "rec709"),
            ("rec-709", "rec709"),
            ("bt2020", "rec2020"),
            ("rec-2020", "rec2020"),
            ("p3", "display-p3"),
            ("displayp3", "display-p3"),
            ("adobe", "adobe-rgb"),
            ("adobe-rgb-1998", "adobe-rgb"),
        ] {
            res.aliases.insert(alias.to_string(), key.to_string());
        }

        res
    }

    /// Built-in spaces extended with (and overridden by) those in `conf`.
    /// Every configured space is validated before it is accepted.
    pub fn from_config(conf: &AppConfig) -> ColorResult<Self> {
        let mut res = Self::new();

        for (key, csc) in &conf.colorspaces {
            let space = csc.to_colorspace(key);
            space.validate()?;
            log::debug!("Loaded color space [{key}] from config");
            res.insert(key, space);
        }

        Ok(res)
    }

    pub fn insert(&mut self, key: &str, space: ColorSpace) {
        let key = normalize(key);
        self.aliases.remove(&key);
        self.spaces.insert(key, space);
    }

    pub fn get(&self, name: &str) -> ColorResult<&ColorSpace> {
        let key = normalize(name);
        let key = self.aliases.get(&key).unwrap_or(&key);

        self.spaces
            .get(key)
            .ok_or_else(|| ColorError::UnknownColorSpace(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColorSpace)> {
        self.spaces.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
