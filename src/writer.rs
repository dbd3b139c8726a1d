use crate::CrawlerError;
use serde::Serialize;
use std::{io::Write, marker::PhantomData};

/// A row type with a fixed column order.
pub trait CsvRecord: Serialize {
    const HEADER: &'static [&'static str];
}

/// Csv output with a fixed column order, flushed after every row.
///
/// The csv writer flushes on drop too, so bailing out early still leaves
/// complete rows behind.
pub struct RecordWriter<W: Write, R: CsvRecord> {
    inner: csv::Writer<W>,
    written: u64,
    _record: PhantomData<fn(&R)>,
}

impl<W: Write, R: CsvRecord> RecordWriter<W, R> {
    /// Wraps `out` and writes the header row.
    pub fn open(out: W) -> Result<Self, CrawlerError> {
        let inner = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);
        let mut writer = RecordWriter {
            inner,
            written: 0,
            _record: PhantomData,
        };
        writer.write_header()?;
        Ok(writer)
    }

    fn write_header(&mut self) -> Result<(), CrawlerError> {
        self.inner.write_record(R::HEADER)?;
        self.inner.flush()?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &R) -> Result<(), CrawlerError> {
        self.inner.serialize(record)?;
        self.inner.flush()?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes and hands back the underlying writer.
    pub fn close(self) -> Result<W, CrawlerError> {
        self.inner
            .into_inner()
            .map_err(|e| CrawlerError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realestate::ListingRecord;
    use pretty_assertions::assert_eq;

    type ListingWriter = RecordWriter<Vec<u8>, ListingRecord>;

    fn record(n: u32) -> ListingRecord {
        ListingRecord {
            bed: n,
            bath: 1,
            car: 0,
            price: format!("$1,{}00,000", n),
            address: format!("{} Smith St, Tempe", n),
            url: format!("http://www.realestate.com.au/property-{}", n),
        }
    }

    #[test]
    fn test_header_only() {
        let out = ListingWriter::open(Vec::new()).unwrap().close().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "bed,bath,car,price,address,url\n");
    }

    #[test]
    fn test_rows_read_back() {
        let mut writer = ListingWriter::open(Vec::new()).unwrap();
        for n in 1..=3 {
            writer.write_record(&record(n)).unwrap();
        }
        assert_eq!(writer.written(), 3);
        let out = writer.close().unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["bed", "bath", "car", "price", "address", "url"]
        );
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1].iter().collect::<Vec<_>>(),
            vec![
                "2",
                "1",
                "0",
                "$1,200,000",
                "2 Smith St, Tempe",
                "http://www.realestate.com.au/property-2"
            ]
        );
    }

    #[test]
    fn test_quoting() {
        let mut writer = ListingWriter::open(Vec::new()).unwrap();
        writer
            .write_record(&ListingRecord {
                bed: 3,
                bath: 2,
                car: 1,
                price: "$750,000".to_string(),
                address: "12 Smith St".to_string(),
                url: "http://www.realestate.com.au/property-123".to_string(),
            })
            .unwrap();
        let out = String::from_utf8(writer.close().unwrap()).unwrap();
        assert_eq!(
            out.lines().nth(1).unwrap(),
            r#"3,2,1,"$750,000",12 Smith St,http://www.realestate.com.au/property-123"#
        );
    }

    #[test]
    fn test_drop_keeps_complete_rows() {
        let mut out = Vec::new();
        {
            let mut writer = RecordWriter::<_, ListingRecord>::open(&mut out).unwrap();
            writer.write_record(&record(1)).unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }
}
