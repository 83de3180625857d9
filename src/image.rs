use std::fs;
use std::path::Path;

use miette::Result;

use crate::error;
use crate::runtime::MEMORY_MAX;

/// A parsed object file: load origin plus program words in host order.
///
/// On disk an image is a 2-byte big-endian origin followed by big-endian
/// words. The file carries no length field; its size determines the word
/// count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    /// Address the first word is placed at
    pub origin: u16,
    pub words: Vec<u16>,
}

impl Image {
    /// Read and parse an object file from disk.
    pub fn read_from(path: &Path) -> Result<Image> {
        let bytes = fs::read(path).map_err(|err| error::image_open(path, err))?;
        Image::parse(&bytes).ok_or_else(|| error::image_no_origin(path))
    }

    /// Parse an object file, or `None` if it is too short to hold an origin.
    ///
    /// Words that would land past the top of the address space are
    /// discarded, as is a trailing odd byte.
    pub fn parse(bytes: &[u8]) -> Option<Image> {
        let origin_bytes = bytes.get(0..2)?;
        let origin = u16::from_be_bytes([origin_bytes[0], origin_bytes[1]]);
        let max_words = MEMORY_MAX - origin as usize;
        let words = bytes[2..]
            .chunks_exact(2)
            .take(max_words)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Some(Image { origin, words })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(origin: u16, words: &[u16]) -> Vec<u8> {
        let mut bytes = origin.to_be_bytes().to_vec();
        for word in words {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn parses_origin_and_words() {
        let words = [0xE003, 0xF022, 0xF025, 0x1234];
        let image = Image::parse(&encode(0x3000, &words)).unwrap();
        assert_eq!(image.origin, 0x3000);
        assert_eq!(image.words, words);
    }

    #[test]
    fn empty_program_is_valid() {
        let image = Image::parse(&encode(0x3000, &[])).unwrap();
        assert_eq!(image.origin, 0x3000);
        assert!(image.words.is_empty());
    }

    #[test]
    fn trailing_odd_byte_is_ignored() {
        let mut bytes = encode(0x3000, &[0xF025]);
        bytes.push(0xAB);
        let image = Image::parse(&bytes).unwrap();
        assert_eq!(image.words, [0xF025]);
    }

    #[test]
    fn words_past_top_of_memory_are_discarded() {
        let image = Image::parse(&encode(0xFFFF, &[1, 2, 3])).unwrap();
        assert_eq!(image.words, [1]);
    }

    #[test]
    fn zero_origin_fills_the_whole_address_space() {
        let words: Vec<u16> = (0..MEMORY_MAX as u32).map(|i| i as u16).collect();
        let mut bytes = encode(0, &words);
        // One extra word past the cap
        bytes.extend_from_slice(&0xABCDu16.to_be_bytes());
        let image = Image::parse(&bytes).unwrap();
        assert_eq!(image.words.len(), MEMORY_MAX);
        assert_eq!(image.words[0xFFFF], 0xFFFF);
    }

    #[test]
    fn short_file_has_no_origin() {
        assert_eq!(Image::parse(&[]), None);
        assert_eq!(Image::parse(&[0x30]), None);
    }
}
