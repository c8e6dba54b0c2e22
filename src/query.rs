use crate::store::Student;

/// Case-insensitive substring match over name, address and program;
/// the raw term is also matched against the decimal form of the id.
/// An empty term matches everything. Insertion order is preserved.
pub fn filter<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    if term.is_empty() {
        return students.iter().collect();
    }
    let needle = term.to_lowercase();
    students
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&needle)
                || s.address.to_lowercase().contains(&needle)
                || s.program.to_lowercase().contains(&needle)
                || s.id.to_string().contains(term)
        })
        .collect()
}

/// The slice `[page*size, page*size+size)`, clamped to the collection.
/// Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
