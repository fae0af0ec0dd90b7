//! Assembly of list results.
//!
//! Records are already JSON objects, so a list result is their raw bytes
//! joined with `,` inside `[` and `]`. Nothing is parsed or re-encoded.

/// Incremental builder for a JSON array of pre-encoded records.
#[derive(Debug)]
pub struct JsonArrayAssembler {
    buffer: Vec<u8>,
    count: usize,
}

impl JsonArrayAssembler {
    pub fn new() -> Self {
        Self {
            buffer: vec![b'['],
            count: 0,
        }
    }

    /// Append one record, writing a separator before all but the first.
    pub fn push(&mut self, record: &[u8]) {
        if self.count > 0 {
            self.buffer.push(b',');
        }
        self.buffer.extend_from_slice(record);
        self.count += 1;
    }

    /// Number of records pushed so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Close the array and return its bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.push(b']');
        self.buffer
    }
}

impl Default for JsonArrayAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain `records` into a JSON array.
///
/// The first failed record aborts assembly; the partial buffer is dropped
/// and the error returned.
pub fn assemble<I, R, E>(records: I) -> Result<Vec<u8>, E>
where
    I: IntoIterator<Item = Result<R, E>>,
    R: AsRef<[u8]>,
{
    let mut assembler = JsonArrayAssembler::new();
    for record in records {
        assembler.push(record?.as_ref());
    }
    Ok(assembler.finish())
}
