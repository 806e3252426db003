pub fn render_schema(vector_dim: u32) -> String {
	let init = include_str!("../../../sql/init.sql");
	let expanded = expand_includes(init);

	expanded.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_artists.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_artists.sql")),
				"tables/002_events.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_events.sql")),
				"tables/003_event_embeddings.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_event_embeddings.sql")),
				"tables/004_search_caches.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_search_caches.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn substitutes_the_vector_dimension() {
		let schema = render_schema(1_536);

		assert!(schema.contains("vector(1536)"));
		assert!(!schema.contains("<VECTOR_DIM>"));
		assert!(schema.contains("search_caches"));
	}
}
