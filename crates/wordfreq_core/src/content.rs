/// Raw document content, readable either whole or line by line.
pub trait ContentHandle {
    /// The full byte sequence of the document.
    fn read_all(&self) -> &[u8];

    /// Successive lines of the document. Each line keeps its trailing `\n`;
    /// a final line without one is still yielded.
    fn lines(&self) -> ByteLines<'_> {
        ByteLines::new(self.read_all())
    }
}

impl ContentHandle for [u8] {
    fn read_all(&self) -> &[u8] {
        self
    }
}

impl ContentHandle for Vec<u8> {
    fn read_all(&self) -> &[u8] {
        self
    }
}

impl ContentHandle for str {
    fn read_all(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl ContentHandle for String {
    fn read_all(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Iterator over `\n`-terminated byte lines.
#[derive(Debug, Clone)]
pub struct ByteLines<'a> {
    rest: &'a [u8],
}

impl<'a> ByteLines<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }
}

impl<'a> Iterator for ByteLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let split_at = match self.rest.iter().position(|&b| b == b'\n') {
            Some(pos) => pos + 1,
            None => self.rest.len(),
        };
        let (line, rest) = self.rest.split_at(split_at);
        self.rest = rest;
        Some(line)
    }
}
