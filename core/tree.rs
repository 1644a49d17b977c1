use indexmap::IndexMap;
use log;

pub const DIRECTORY_ICON: &str = "📁";
pub const FILE_ICON: &str = "📄";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// A node of the rendered directory tree.
///
/// There is no stored file/directory tag: a node with children is a
/// directory, a node without is a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeNode {
    name: String,
    children: IndexMap<String, TreeNode>,
}

impl TreeNode {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    fn insert_segments<'a>(&mut self, segments: impl Iterator<Item = &'a str>) {
        let mut current = self;
        for segment in segments {
            current = current
                .children
                .entry(segment.to_string())
                .or_insert_with(|| TreeNode::named(segment));
        }
    }

    pub fn render(&self) -> String {
        render(self)
    }
}

/// Nests relative `/`-separated paths into a tree rooted at an unnamed node.
///
/// Paths are inserted in ascending order, so siblings come out alphabetical
/// with files and directories interleaved.
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> TreeNode {
    let mut sorted: Vec<&str> = paths.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    log::debug!("Building tree structure from {} paths...", sorted.len());

    let mut root = TreeNode::default();
    for path in sorted {
        root.insert_segments(path.split('/').filter(|s| !s.is_empty()));
    }
    root
}

/// Draws the tree one line per node, pre-order. Top-level entries carry no
/// connector. Returns an empty string for an empty tree.
pub fn render(root: &TreeNode) -> String {
    let mut lines = Vec::new();
    render_level(root, "", true, &mut lines);
    lines.join("\n")
}

fn render_level(node: &TreeNode, prefix: &str, is_root: bool, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (index, child) in node.children.values().enumerate() {
        let is_last = index + 1 == count;
        let (connector, child_prefix) = if is_root {
            ("", String::new())
        } else if is_last {
            (LAST_BRANCH, format!("{prefix}{SPACE_INDENT}"))
        } else {
            (BRANCH, format!("{prefix}{PIPE_INDENT}"))
        };
        let icon = if child.is_dir() {
            DIRECTORY_ICON
        } else {
            FILE_ICON
        };
        lines.push(format!("{prefix}{connector}{icon} {}", child.name));

        if child.is_dir() {
            render_level(child, &child_prefix, false, lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_empty_string() {
        let paths: [&str; 0] = [];
        let tree = build_tree(&paths);
        assert!(!tree.is_dir());
        assert_eq!(render(&tree), "");
    }

    #[test]
    fn renders_connectors_and_icons() {
        let tree = build_tree(&[
            "src/auth/auth.service.ts",
            "src/auth/auth.module.ts",
            "src/main.ts",
            "package.json",
        ]);
        let expected = "\
📄 package.json
📁 src
├── 📁 auth
│   ├── 📄 auth.module.ts
│   └── 📄 auth.service.ts
└── 📄 main.ts";
        assert_eq!(render(&tree), expected);
    }

    #[test]
    fn last_sibling_extends_prefix_with_spaces() {
        let tree = build_tree(&["a/b/c/d.ts", "a/x.ts", "a/b/e.ts"]);
        let expected = "\
📁 a
├── 📁 b
│   ├── 📁 c
│   │   └── 📄 d.ts
│   └── 📄 e.ts
└── 📄 x.ts";
        assert_eq!(render(&tree), expected);

        let tree = build_tree(&["a/b/c.ts", "a/b/d.ts"]);
        let expected = "\
📁 a
└── 📁 b
    ├── 📄 c.ts
    └── 📄 d.ts";
        assert_eq!(render(&tree), expected);
    }

    #[test]
    fn input_order_does_not_change_structure() {
        let forward = ["b/y.ts", "a.ts", "b/x.ts", "c/z.ts"];
        let backward = ["c/z.ts", "b/x.ts", "a.ts", "b/y.ts"];
        assert_eq!(build_tree(&forward), build_tree(&backward));
        assert_eq!(render(&build_tree(&forward)), render(&build_tree(&backward)));
    }

    #[test]
    fn render_is_idempotent() {
        let paths = vec!["x/y/z.ts".to_string(), "x/a.ts".to_string()];
        let first = render(&build_tree(&paths));
        let second = render(&build_tree(&paths));
        assert_eq!(first, second);
        let tree = build_tree(&paths);
        assert_eq!(tree.render(), tree.render());
        assert_eq!(paths, vec!["x/y/z.ts".to_string(), "x/a.ts".to_string()]);
    }

    #[test]
    fn directory_ness_is_structural() {
        // "a.ts" gets a child, so it renders as a directory.
        let tree = build_tree(&["a.ts", "a.ts/b.ts"]);
        let node = tree.child("a.ts").unwrap();
        assert!(node.is_dir());
        assert_eq!(render(&tree), "📁 a.ts\n└── 📄 b.ts");
    }

    #[test]
    fn siblings_interleave_files_and_dirs_by_name() {
        let tree = build_tree(&["lib.ts", "app/x.ts", "zeta/y.ts", "index.ts"]);
        let names: Vec<&str> = tree.children().map(|c| c.name()).collect();
        assert_eq!(names, vec!["app", "index.ts", "lib.ts", "zeta"]);
    }
}
