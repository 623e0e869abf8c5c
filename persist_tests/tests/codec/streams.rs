use anyhow::Result;
use itertools::Itertools;
use persist_format::persist_types::serde::{BinaryReader, BinaryWriter, Writer};
use persist_format::persist_types::types::DateTime;
use persist_format::{read_args, read_descriptor, write_args, Printer};
use persist_schema::log_file::{read_log, write_log};
use persist_schema::row_key::is_row_key_descriptor;
use persist_schema::{LogEntry, RowKey, ROW_KEY_DESCRIPTOR};
use rand::Rng;

pub fn test_streams() -> Result<()> {
    test_descriptor_then_records()?;
    test_printing_a_stream()?;
    test_log_file()?;
    test_row_keys()?;
    Ok(())
}

/// One descriptor, then many argument lists of that shape.
fn test_descriptor_then_records() -> Result<()> {
    let mut rng = rand::thread_rng();
    let records = (0..100)
        .map(|i| (i as u32, rng.gen::<f64>(), format!("record {}", i)))
        .collect::<Vec<_>>();

    let mut w = BinaryWriter::new(vec![]);
    let (id, value, name) = &records[0];
    w.write_bytes(&persist_format::descriptor!(id, value, name))?;
    for (id, value, name) in records.iter() {
        write_args!(&mut w, id, value, name)?;
    }
    let expected_len = persist_format::descriptor!(id, value, name).len()
        + records
            .iter()
            .map(|(id, value, name)| persist_format::buffer_size!(id, value, name))
            .sum::<usize>();
    assert_eq!(expected_len, *w.write_len());

    let data = w.into_inner();
    let mut r = BinaryReader::new(&data[..]);
    let descriptor = read_descriptor(&mut r)?;
    assert_eq!(persist_format::descriptor::<(u32, f64, String)>(), descriptor);
    for record in records.iter() {
        let (mut id, mut value, mut name) = (0u32, 0f64, String::new());
        read_args!(&mut r, id, value, name)?;
        assert_eq!(record, &(id, value, name));
    }
    assert_eq!(data.len(), *r.read_len());
    Ok(())
}

/// A reader that knows only the descriptor formats every record.
fn test_printing_a_stream() -> Result<()> {
    let mut w = BinaryWriter::new(vec![]);
    let rows = [(1i64, vec![1u8, 2]), (-2, vec![]), (300, vec![255])];
    for (n, bytes) in rows.iter() {
        write_args!(&mut w, n, bytes)?;
    }
    let descriptor = persist_format::descriptor::<(i64, Vec<u8>)>();
    let printer = Printer::new("{0:x} -> {1}", &descriptor)?;

    let data = w.into_inner();
    let mut r = &data[..];
    let lines = rows
        .iter()
        .map(|_| printer.print_to_string(&mut r))
        .collect::<Result<Vec<_>>>()?;
    assert!(r.is_empty());
    assert_eq!("1 -> {1;2}\n-2 -> {}\n12c -> {255}", lines.iter().join("\n"));
    Ok(())
}

fn test_log_file() -> Result<()> {
    let entries = vec![
        LogEntry::new(DateTime(10), 1, 7, "started", &())?,
        LogEntry::new(
            DateTime(11),
            2,
            7,
            "{} of {} done, {:e}",
            &(3u16, 4u16, 0.75f64),
        )?,
        LogEntry::new(DateTime(12), 3, 8, "{{{}}}", &("braced".to_string(),))?,
    ];
    let mut buf = vec![];
    write_log(&mut buf, &entries)?;
    let out = read_log(&mut &buf[..])?;
    assert_eq!(entries, out);

    let messages = out.iter().map(LogEntry::render).collect::<Result<Vec<_>>>()?;
    assert_eq!(
        vec!["started", "3 of 4 done, 7.500000e-01", "{braced}"],
        messages
    );

    // Truncated logs fail instead of yielding partial entries.
    assert!(read_log(&mut &buf[..buf.len() - 1]).is_err());
    Ok(())
}

fn test_row_keys() -> Result<()> {
    assert!(is_row_key_descriptor(ROW_KEY_DESCRIPTOR));
    assert!(!is_row_key_descriptor(&persist_format::descriptor::<(String, i64)>()));

    let mut rng = rand::thread_rng();
    let tables = ["a", "ab", "b", "ba"];
    let mut keys = (0..200)
        .map(|_| RowKey::new(tables[rng.gen_range(0..tables.len())], rng.gen::<i64>()))
        .collect::<Vec<_>>();
    let mut encoded = keys.iter().map(RowKey::encode).collect::<Result<Vec<_>>>()?;
    keys.sort();
    encoded.sort();
    for (key, bytes) in keys.iter().zip(encoded.iter()) {
        assert_eq!(key, &RowKey::decode(bytes)?);
    }
    Ok(())
}
