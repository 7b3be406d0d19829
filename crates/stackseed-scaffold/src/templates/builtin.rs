//! Template trees compiled into the binary.

use crate::templates::{TemplateFile, TemplateTree, TemplateTreeId};

macro_rules! template_files {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $path)))),*]
    };
}

const ROOT: &[(&str, &str)] = template_files![
    "root/.gitignore",
    "root/.node-version",
    "root/.npmrc",
    "root/README.md",
    "root/biome.json",
    "root/packages/README.md",
];

const API: &[(&str, &str)] = template_files![
    "api/package.json",
    "api/src/index.ts",
    "api/tsconfig.json",
];

const WEB: &[(&str, &str)] = template_files![
    "web/index.html",
    "web/package.json",
    "web/src/App.tsx",
    "web/src/main.tsx",
    "web/tsconfig.json",
    "web/vite.config.ts",
];

const APP: &[(&str, &str)] = template_files![
    "app/App.tsx",
    "app/app.json",
    "app/babel.config.js",
    "app/package.json",
    "app/tsconfig.json",
];

/// The embedded tree for `id`.
pub(crate) fn tree(id: TemplateTreeId) -> TemplateTree {
    let entries = match id {
        TemplateTreeId::Root => ROOT,
        TemplateTreeId::Api => API,
        TemplateTreeId::Web => WEB,
        TemplateTreeId::App => APP,
    };
    let prefix = format!("{}/", id.as_str());

    let files = entries
        .iter()
        .map(|&(path, content)| {
            let rel = path.strip_prefix(prefix.as_str()).unwrap_or(path);
            TemplateFile::new(rel, content)
        })
        .collect();

    TemplateTree { id, files }
}
