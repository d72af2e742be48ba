use serde::Serialize;
use serde_json::{json, Value};

/// The field templates kept as JSON files under `<templates>/fields/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    ContactRoles,
    EvidenceTypes,
    KanbanColumns,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::ContactRoles,
        TemplateKind::EvidenceTypes,
        TemplateKind::KanbanColumns,
    ];

    /// Route segment under `/api/templates/fields/`
    pub fn slug(&self) -> &'static str {
        match self {
            TemplateKind::ContactRoles => "contact-roles",
            TemplateKind::EvidenceTypes => "evidence-types",
            TemplateKind::KanbanColumns => "kanban-columns",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateKind::ContactRoles => "contactRoles.json",
            TemplateKind::EvidenceTypes => "evidenceTypes.json",
            TemplateKind::KanbanColumns => "kanbanColumns.json",
        }
    }

    pub fn backup_file_name(&self) -> String {
        self.file_name().replace(".json", ".backup.json")
    }

    /// Key of the array every template of this kind must carry.
    pub fn array_key(&self) -> &'static str {
        match self {
            TemplateKind::ContactRoles => "roles",
            TemplateKind::EvidenceTypes => "types",
            TemplateKind::KanbanColumns => "columns",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TemplateKind::ContactRoles => "Contact roles",
            TemplateKind::EvidenceTypes => "Evidence types",
            TemplateKind::KanbanColumns => "Kanban columns",
        }
    }

    /// Key used in the template info listing.
    pub fn info_key(&self) -> &'static str {
        match self {
            TemplateKind::ContactRoles => "contactRoles",
            TemplateKind::EvidenceTypes => "evidenceTypes",
            TemplateKind::KanbanColumns => "kanbanColumns",
        }
    }

    pub fn is_valid(&self, template: &Value) -> bool {
        template
            .get(self.array_key())
            .is_some_and(Value::is_array)
    }

    /// Content written when the template file does not exist yet.
    pub fn default_content(&self) -> Value {
        match self {
            TemplateKind::ContactRoles => json!({
                "name": "Contact Roles",
                "roles": [
                    {"value": "CLIENT", "label": "Client"},
                    {"value": "PARENT", "label": "Parent"},
                    {"value": "CHILD", "label": "Child"},
                    {"value": "GUARDIAN", "label": "Guardian"},
                    {"value": "ATTORNEY", "label": "Attorney"},
                    {"value": "CASEWORKER", "label": "Caseworker"},
                    {"value": "THERAPIST", "label": "Therapist"},
                    {"value": "JUDGE", "label": "Judge"},
                    {"value": "OTHER", "label": "Other"}
                ]
            }),
            TemplateKind::EvidenceTypes => json!({
                "name": "Evidence Types",
                "types": [
                    {"value": "DOCUMENT", "label": "Document"},
                    {"value": "PHOTO", "label": "Photo"},
                    {"value": "VIDEO", "label": "Video"},
                    {"value": "AUDIO", "label": "Audio recording"},
                    {"value": "REPORT", "label": "Professional report"},
                    {"value": "OTHER", "label": "Other"}
                ]
            }),
            TemplateKind::KanbanColumns => json!({
                "name": "Kanban Columns",
                "columns": [
                    {"id": "todo", "title": "To Do"},
                    {"id": "in-progress", "title": "In Progress"},
                    {"id": "review", "title": "Review"},
                    {"id": "done", "title": "Done"}
                ]
            }),
        }
    }
}
