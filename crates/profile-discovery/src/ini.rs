//! Minimal line-based ini scanning
//!
//! profiles.ini is two levels deep with plain `key=value` lines, so a full
//! ini dependency buys nothing here. Unrecognized lines are skipped.

pub(crate) struct Section {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub(crate) fn parse_sections(content: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push(Section {
                name: name.trim().to_string(),
                entries: Vec::new(),
            });
        } else if let Some((key, value)) = line.split_once('=') {
            if let Some(current) = sections.last_mut() {
                current
                    .entries
                    .push((key.trim().to_string(), value.trim().to_string()));
            }
        }
    }

    sections
}
