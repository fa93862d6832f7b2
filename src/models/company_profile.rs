use std::path::Path;

use anyhow::{Context, Result, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// The shop's own details, printed at the top of every quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub name: String,
    pub owner_name: String,
    /// CNPJ.
    pub tax_id: String,
    pub phone: String,
    /// Logo as a `data:` URL, empty when unset.
    pub logo: String,
}

impl CompanyProfile {
    pub fn has_logo(&self) -> bool {
        !self.logo.is_empty()
    }

    /// Read an image file and store it as the logo.
    pub fn load_logo(&mut self, path: &Path) -> Result<()> {
        let mime = logo_mime(path)?;
        let bytes = std::fs::read(path)
            .with_context(|| format!("could not read logo file {}", path.display()))?;
        self.logo = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
        Ok(())
    }
}

fn logo_mime(path: &Path) -> Result<mime::Mime> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "svg" => mime::IMAGE_SVG,
        "bmp" => mime::IMAGE_BMP,
        "webp" => "image/webp".parse::<mime::Mime>()?,
        other => bail!("unsupported logo format: {other:?}"),
    };

    Ok(mime)
}
