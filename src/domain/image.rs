use std::fmt;

use thiserror::Error;

/// Multipart field the backend reads the uploaded image from.
pub const IMAGE_FIELD: &str = "image";

pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
}

impl ImageFormat {
    /// Identifies the format from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageUploadError {
    #[error("image file is empty")]
    Empty,
    #[error("file is not a supported image (jpeg, png, gif, webp, bmp)")]
    NotAnImage,
    #[error("image is {size} bytes, the upload limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

/// An image that passed type and size checks and may be submitted for
/// disease detection.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn from_bytes(
        file_name: &str,
        bytes: Vec<u8>,
        max_bytes: u64,
    ) -> Result<Self, ImageUploadError> {
        if bytes.is_empty() {
            return Err(ImageUploadError::Empty);
        }

        let size = bytes.len() as u64;
        if size > max_bytes {
            return Err(ImageUploadError::TooLarge {
                size,
                limit: max_bytes,
            });
        }

        let format = ImageFormat::sniff(&bytes).ok_or(ImageUploadError::NotAnImage)?;
        let file_name = match file_name.trim() {
            "" => format!("upload.{}", format.extension()),
            name => name.to_owned(),
        };

        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
