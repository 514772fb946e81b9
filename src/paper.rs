/// One row of the papers CSV. `paper_id` is the unique key; the remaining
/// columns are free-form metadata used to fill the tracking issue.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperRecord {
    pub paper_id: String,
    pub title: Option<String>,
    pub coder: Option<String>,
    pub supervisor: Option<String>,
    pub collection: Option<String>,
}
