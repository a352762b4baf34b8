/// A protein sequence with the identifying metadata carried by its FASTA header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinSequence {
    pub id: String,
    pub description: String,
    pub gene_symbol: Option<String>,
    residues: String,
}

impl ProteinSequence {
    pub fn new(id: impl Into<String>, residues: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            gene_symbol: None,
            residues: residues.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_gene_symbol(mut self, gene_symbol: impl Into<String>) -> Self {
        self.gene_symbol = Some(gene_symbol.into());
        self
    }

    pub fn residues(&self) -> &str {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residue at a 1-based position.
    pub fn residue_at(&self, position: usize) -> Option<char> {
        position
            .checked_sub(1)
            .and_then(|idx| self.residues.as_bytes().get(idx))
            .map(|&b| b as char)
    }

    pub fn has_gene_symbol(&self, symbol: &str) -> bool {
        self.gene_symbol.as_deref() == Some(symbol)
    }
}
