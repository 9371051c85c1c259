/// Capacity of a single block in bytes. Kept tiny so multi-block files are common.
pub const BLOCK_SIZE: usize = 8;

/// Fixed-capacity chunk of file data. Only `data[..end]` is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    data: [u8; BLOCK_SIZE],
    end: usize,
}

impl Block {
    fn empty() -> Self {
        Block {
            data: [0; BLOCK_SIZE],
            end: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.end]
    }

    pub fn spare(&self) -> usize {
        BLOCK_SIZE - self.end
    }

    /// Copies as much of `data` as fits and returns the number of bytes taken.
    fn fill(&mut self, data: &[u8]) -> usize {
        let taken = data.len().min(self.spare());
        self.data[self.end..self.end + taken].copy_from_slice(&data[..taken]);
        self.end += taken;
        taken
    }
}

/// Contents of a file as an ordered sequence of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileContents {
    blocks: Vec<Block>,
}

impl FileContents {
    /// Appends `data`, topping up the last block before allocating new ones.
    pub fn append(&mut self, mut data: &[u8]) {
        if let Some(last) = self.blocks.last_mut() {
            let taken = last.fill(data);
            data = &data[taken..];
        }

        while !data.is_empty() {
            let mut block = Block::empty();
            let taken = block.fill(data);
            data = &data[taken..];
            self.blocks.push(block);
        }
    }

    pub fn read(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for block in &self.blocks {
            out.extend_from_slice(block.as_bytes());
        }
        out
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn len(&self) -> usize {
        self.blocks.iter().map(|block| block.end).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }
}
