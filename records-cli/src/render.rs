use records_core::CatalogSnapshot;

/// Plain-text listing of the visible records, one per line.
pub fn render(snapshot: &CatalogSnapshot) -> String {
    let mut out = String::new();
    for record in snapshot.visible_records() {
        let artist = snapshot
            .artist(record.artist)
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown Artist");
        out.push_str(&format!(
            "{:>4}  {}  ({})  {}  [{}]\n",
            record.id, record.album_title, record.year, artist, record.condition
        ));
    }

    let visible = snapshot.visible_records().count();
    out.push_str(&format!(
        "{} of {} records shown{}\n",
        visible,
        snapshot.records.len(),
        if snapshot.has_more {
            ", more available"
        } else {
            ""
        }
    ));
    out
}
