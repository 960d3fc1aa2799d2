//! Result sink and the records pushed into it

/// A browse category; the root plus one child per channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: String,
    pub title: String,
    pub subdepartments: Vec<Department>,
}

impl Department {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subdepartments: Vec::new(),
        }
    }

    pub fn add_subdepartment(&mut self, department: Department) {
        self.subdepartments.push(department);
    }

    /// Find a department by id in this subtree
    pub fn find(&self, id: &str) -> Option<&Department> {
        if self.id == id {
            return Some(self);
        }
        self.subdepartments.iter().find_map(|child| child.find(id))
    }
}

/// Group of results shown together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub title: String,
}

/// One display-ready result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Id of the category the result belongs to
    pub category: String,
    pub uri: String,
    pub title: String,
    pub art: String,
    pub description: String,
    pub username: String,
}

/// Receiver of the output of one query
pub trait SearchReply {
    fn register_departments(&mut self, root: Department);

    fn register_category(&mut self, id: &str, title: &str) -> Category;

    /// Returns false when no further results are wanted
    fn push(&mut self, result: SearchResult) -> bool;
}

/// In-memory reply, optionally accepting only a limited number of results
#[derive(Debug, Default)]
pub struct CollectingReply {
    pub departments: Option<Department>,
    pub categories: Vec<Category>,
    pub results: Vec<SearchResult>,
    limit: Option<usize>,
}

impl CollectingReply {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept at most `limit` results
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Results registered under `category`
    pub fn results_in(&self, category: &str) -> Vec<&SearchResult> {
        self.results.iter().filter(|r| r.category == category).collect()
    }
}

impl SearchReply for CollectingReply {
    fn register_departments(&mut self, root: Department) {
        self.departments = Some(root);
    }

    fn register_category(&mut self, id: &str, title: &str) -> Category {
        let category = Category {
            id: id.to_string(),
            title: title.to_string(),
        };
        self.categories.push(category.clone());
        category
    }

    fn push(&mut self, result: SearchResult) -> bool {
        if let Some(limit) = self.limit {
            if self.results.len() >= limit {
                return false;
            }
        }
        self.results.push(result);
        self.limit.map_or(true, |limit| self.results.len() < limit)
    }
}
