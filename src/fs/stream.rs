//! ## Stream
//!
//! buffered streams returned by `open` and `create`

/**
 * MIT License
 *
 * sftpctl - Copyright (c) 2021 Christian Visintin
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */
use std::io::{BufReader, BufWriter, Read, Write};

/// Buffer size of the streams; a multiple of the 32K sftp packet
const BUFFER_SIZE: usize = 65536;

/// Content of a remote file, returned by `RemoteFs::open`.
/// The remote handle is closed when the stream is dropped.
pub struct ReadStream {
    reader: BufReader<Box<dyn Read>>,
    bytes: u64,
}

impl ReadStream {
    pub fn new<R: Read + 'static>(reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(BUFFER_SIZE, Box::new(reader)),
            bytes: 0,
        }
    }

    /// Amount of bytes read so far
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Read for ReadStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }
}

/// Sink to a remote file, returned by `RemoteFs::create`.
/// Data is only guaranteed to reach the server after `flush`;
/// the remote handle is closed when the stream is dropped.
pub struct WriteStream {
    writer: BufWriter<Box<dyn Write>>,
    bytes: u64,
}

impl WriteStream {
    pub fn new<W: Write + 'static>(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_SIZE, Box::new(writer)),
            bytes: 0,
        }
    }

    /// Amount of bytes written so far
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Write for WriteStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod test {

    use super::*;

    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn should_count_bytes_read() {
        let mut stream = ReadStream::new(Cursor::new(b"hello".to_vec()));
        let mut buf = String::new();
        assert_eq!(stream.read_to_string(&mut buf).unwrap(), 5);
        assert_eq!(buf.as_str(), "hello");
        assert_eq!(stream.bytes(), 5);
    }

    #[test]
    fn should_reach_sink_on_flush() {
        let data = Rc::new(RefCell::new(Vec::new()));
        let mut stream = WriteStream::new(Sink(data.clone()));
        stream.write_all(b"hello").unwrap();
        assert_eq!(stream.bytes(), 5);
        assert!(data.borrow().is_empty());
        stream.flush().unwrap();
        assert_eq!(data.borrow().as_slice(), b"hello");
    }
}
