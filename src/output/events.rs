// events.rs - CSV table of trait state changes

use crate::phylo::StateChange;

pub const EVENT_HEADER: [&str; 4] = ["", "EventTime", "Origin", "Destination"];

/// Write one indexed row per state change.
///
/// The first column is an unnamed 0-based row index, matching tables
/// exported from data frames.
pub fn write_events_csv(file_path: &str, events: &[StateChange]) -> Result<(), String> {
    super::ensure_parent_dir(file_path)?;
    let mut writer = csv::Writer::from_path(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;

    writer
        .write_record(EVENT_HEADER)
        .map_err(|e| format!("Write error on '{}': {}", file_path, e))?;

    for (idx, event) in events.iter().enumerate() {
        writer
            .write_record([
                idx.to_string(),
                format_time(event.time),
                event.origin.clone(),
                event.destination.clone(),
            ])
            .map_err(|e| format!("Write error on '{}': {}", file_path, e))?;
    }

    writer.flush().map_err(|e| format!("Flush error on '{}': {}", file_path, e))?;
    println!("✅ Events saved to {}", file_path);
    Ok(())
}

/// Shortest round-trip form, keeping a trailing `.0` on whole numbers
fn format_time(time: f64) -> String {
    format!("{:?}", time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(time: f64, origin: &str, destination: &str) -> StateChange {
        StateChange {
            node: 0,
            time,
            origin: origin.to_string(),
            destination: destination.to_string(),
        }
    }

    #[test]
    fn test_events_table_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events/out.csv");
        let events = vec![change(2018.0, "UNKNOWN", "Kenya"), change(2019.25, "Kenya", "Uganda, East")];

        write_events_csv(path.to_str().unwrap(), &events).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            ",EventTime,Origin,Destination\n0,2018.0,UNKNOWN,Kenya\n1,2019.25,Kenya,\"Uganda, East\"\n"
        );
    }

    #[test]
    fn test_empty_events_write_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.csv");
        write_events_csv(path.to_str().unwrap(), &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ",EventTime,Origin,Destination\n");
    }
}
