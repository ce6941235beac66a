//! The vocabulary being taught: Chinese prompts and their Malay spellings.
//!
//! The list is static and ordered; the session cycles through it by index.

/// A source/target vocabulary item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPair {
    /// Chinese prompt, shown and spoken
    pub source: &'static str,
    /// Malay word the player spells
    pub target: &'static str,
}

/// Lesson word list. Targets only use lowercase letters and spaces, matching
/// the spawner alphabet.
pub static WORD_PAIRS: &[WordPair] = &[
    WordPair { source: "交通工具", target: "kenderaan" },
    WordPair { source: "状况", target: "situasi" },
    WordPair { source: "安全带", target: "tali pinggang keledar" },
    WordPair { source: "出发", target: "bertolak" },
    WordPair { source: "标签", target: "label" },
    WordPair { source: "零食", target: "makanan ringan" },
    WordPair { source: "材料", target: "ramuan" },
    WordPair { source: "色素", target: "pewarna" },
    WordPair { source: "防腐剂", target: "bahan pengawet" },
];
