/// One clinical visit's block of lines, in original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encounter {
    lines: Vec<String>,
}

impl Encounter {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// All encounters of one patient file, newest first.
///
/// Built once per file by the segmenter and only read afterwards.
/// Neighbouring encounters share two boundary lines, so a line may be
/// seen twice when iterating the whole sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncounterSequence {
    encounters: Vec<Encounter>,
}

impl EncounterSequence {
    pub fn new(encounters: Vec<Encounter>) -> Self {
        Self { encounters }
    }

    pub fn encounters(&self) -> &[Encounter] {
        &self.encounters
    }

    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }

    /// Every line of every encounter, newest encounter first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.encounters.iter().flat_map(Encounter::iter)
    }
}

impl<'a> IntoIterator for &'a EncounterSequence {
    type Item = &'a Encounter;
    type IntoIter = std::slice::Iter<'a, Encounter>;

    fn into_iter(self) -> Self::IntoIter {
        self.encounters.iter()
    }
}

/// Build a sequence straight from per-encounter line lists. Test helper
/// for extractors that don't care about segmentation.
#[cfg(test)]
pub fn sequence_of(groups: &[&[&str]]) -> EncounterSequence {
    EncounterSequence::new(
        groups
            .iter()
            .map(|g| Encounter::new(g.iter().map(|l| l.to_string()).collect()))
            .collect(),
    )
}
