//! Image CDN URL conventions.
//!
//! The CDN transforms images on the fly when transformation parameters are
//! inserted into the delivery URL right after the `upload` path segment. Only
//! URL rewriting lives here; uploading and deleting assets is the CDN's
//! business.

use crate::config::MediaConfig;
use std::str::FromStr;
use url::Url;

/// Named derivative sizes used by the storefront and back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Thumbnail,
    #[default]
    Card,
    Detail,
    Hero,
    /// Format and quality optimization only.
    Original,
}

impl ImageSize {
    #[must_use]
    pub const fn dimensions(self) -> (Option<u32>, Option<u32>) {
        match self {
            Self::Thumbnail => (Some(200), Some(150)),
            Self::Card => (Some(400), Some(300)),
            Self::Detail => (Some(800), Some(600)),
            Self::Hero => (Some(1200), Some(800)),
            Self::Original => (None, None),
        }
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "thumbnail" | "thumb" => Ok(Self::Thumbnail),
            "card" => Ok(Self::Card),
            "detail" => Ok(Self::Detail),
            "hero" => Ok(Self::Hero),
            "original" => Ok(Self::Original),
            other => Err(format!("Unknown image size: {other}")),
        }
    }
}

pub struct ImageService {
    cdn_host: String,
    placeholder: String,
}

impl ImageService {
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            cdn_host: config.cdn_host.to_lowercase(),
            placeholder: config.placeholder_image.clone(),
        }
    }

    /// Whether `url` is served by the configured CDN: its host is the CDN
    /// host or a subdomain of it.
    #[must_use]
    pub fn is_cdn_url(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
            .is_some_and(|host| {
                host == self.cdn_host
                    || host
                        .strip_suffix(self.cdn_host.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
    }

    /// Asset ids of the CDN-hosted entries of `images`.
    #[must_use]
    pub fn cdn_public_ids(&self, images: &[String]) -> Vec<String> {
        images
            .iter()
            .filter(|url| self.is_cdn_url(url))
            .filter_map(|url| public_id(url))
            .collect()
    }

    /// URL of the `size` derivative of `url`. Non-CDN and unparsable URLs are
    /// returned unchanged.
    #[must_use]
    pub fn derivative_url(&self, url: &str, size: ImageSize) -> String {
        if !self.is_cdn_url(url) {
            return url.to_string();
        }

        let Ok(mut parsed) = Url::parse(url) else {
            return url.to_string();
        };

        let mut segments: Vec<String> = parsed
            .path()
            .split('/')
            .map(str::to_string)
            .collect();
        let Some(upload) = segments.iter().position(|s| s == "upload") else {
            return url.to_string();
        };

        segments.insert(upload + 1, transformation(size));
        parsed.set_path(&segments.join("/"));
        parsed.to_string()
    }

    /// URL to show for a listing's main image, falling back to the
    /// placeholder when the listing has no images.
    #[must_use]
    pub fn main_image_url(&self, images: &[String], size: ImageSize) -> String {
        images.first().map_or_else(
            || self.placeholder.clone(),
            |main| self.derivative_url(main, size),
        )
    }
}

fn transformation(size: ImageSize) -> String {
    let mut params = String::from("f_auto,q_auto");
    match size.dimensions() {
        (Some(w), Some(h)) => params.push_str(&format!(",w_{w},h_{h},c_fill")),
        (Some(w), None) => params.push_str(&format!(",w_{w}")),
        (None, Some(h)) => params.push_str(&format!(",h_{h}")),
        (None, None) => {}
    }
    params
}

/// Asset identifier embedded in a CDN delivery URL: the path after `upload`
/// without transformation or version segments and without the extension.
fn public_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path().split('/').collect();
    let upload = segments.iter().position(|s| *s == "upload")?;
    if upload + 1 >= segments.len() {
        return None;
    }

    let joined = segments[upload + 1..]
        .iter()
        .filter(|s| !s.contains(',') && !is_version(s))
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    let id = match joined.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem.to_string(),
        _ => joined,
    };
    Some(id)
}

fn is_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ImageService {
        ImageService::new(&MediaConfig::default())
    }

    const CDN: &str = "https://res.cloudinary.com/demo/image/upload/v1712/cars/camry.jpg";

    #[test]
    fn recognizes_cdn_urls() {
        let images = service();
        assert!(images.is_cdn_url(CDN));
        assert!(!images.is_cdn_url("https://example.com/upload/camry.jpg"));
        assert!(!images.is_cdn_url("/toyota-camry-silver.png"));
    }

    #[test]
    fn rejects_look_alike_hosts() {
        let images = service();
        assert!(images.is_cdn_url("https://eu.res.cloudinary.com/demo/image/upload/a.jpg"));
        assert!(!images.is_cdn_url("https://evilres.cloudinary.com/demo/image/upload/a.jpg"));
        assert!(!images.is_cdn_url("https://notres.cloudinary.com/demo/image/upload/a.jpg"));
        assert_eq!(
            images.derivative_url(
                "https://evilres.cloudinary.com/demo/image/upload/a.jpg",
                ImageSize::Card
            ),
            "https://evilres.cloudinary.com/demo/image/upload/a.jpg"
        );
    }

    #[test]
    fn inserts_transformations_after_upload() {
        let images = service();
        assert_eq!(
            images.derivative_url(CDN, ImageSize::Card),
            "https://res.cloudinary.com/demo/image/upload/f_auto,q_auto,w_400,h_300,c_fill/v1712/cars/camry.jpg"
        );
        assert_eq!(
            images.derivative_url(CDN, ImageSize::Original),
            "https://res.cloudinary.com/demo/image/upload/f_auto,q_auto/v1712/cars/camry.jpg"
        );
    }

    #[test]
    fn non_cdn_urls_pass_through() {
        let images = service();
        let local = "/placeholder.svg?height=400&width=600";
        assert_eq!(images.derivative_url(local, ImageSize::Hero), local);
        assert_eq!(
            images.derivative_url("https://example.com/a.jpg", ImageSize::Hero),
            "https://example.com/a.jpg"
        );
    }

    #[test]
    fn main_image_falls_back_to_placeholder() {
        let images = service();
        assert_eq!(
            images.main_image_url(&[], ImageSize::Card),
            MediaConfig::default().placeholder_image
        );
        assert_eq!(
            images.main_image_url(&["/a.png".to_string()], ImageSize::Card),
            "/a.png"
        );
    }

    #[test]
    fn extracts_public_id() {
        assert_eq!(public_id(CDN).as_deref(), Some("cars/camry"));
        assert_eq!(
            public_id("https://res.cloudinary.com/demo/image/upload/f_auto,q_auto/v9/x.png")
                .as_deref(),
            Some("x")
        );
        assert_eq!(public_id("https://res.cloudinary.com/demo/image/x.png"), None);
        assert_eq!(public_id("not a url"), None);
    }

    #[test]
    fn collects_public_ids_of_cdn_images_only() {
        let images = vec![
            CDN.to_string(),
            "/placeholder.svg".to_string(),
            "https://example.com/image/upload/other.jpg".to_string(),
        ];
        assert_eq!(service().cdn_public_ids(&images), vec!["cars/camry".to_string()]);
    }

    #[test]
    fn parses_size_names() {
        assert_eq!("Hero".parse::<ImageSize>().unwrap(), ImageSize::Hero);
        assert!("poster".parse::<ImageSize>().is_err());
    }
}
