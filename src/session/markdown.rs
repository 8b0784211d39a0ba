//! `## ` section splitting for CLAUDE.md

/// A level-two section: heading line plus body up to the next heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub text: String,
}

/// Split `content` into `## ` sections, ignoring headings inside code fences
pub fn parse_sections(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    let mut in_fence = false;

    for line in content.split('\n') {
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
        }

        if !in_fence && line.starts_with("## ") {
            if let Some((heading, lines)) = current.take() {
                sections.push(Section {
                    heading,
                    text: lines.join("\n"),
                });
            }
            current = Some((line.trim().to_string(), vec![line]));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some((heading, lines)) = current {
        sections.push(Section {
            heading,
            text: lines.join("\n"),
        });
    }

    sections
}

/// First section whose heading contains `key`, case-insensitively
pub fn find_section<'a>(sections: &'a [Section], key: &str) -> Option<&'a Section> {
    let key = key.to_lowercase();
    sections
        .iter()
        .find(|s| s.heading.to_lowercase().contains(&key))
}
