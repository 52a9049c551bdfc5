//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Balanced Solutions Software - Seamless Development and Hosting Solutions for Web, Mobile, and Desktop Applications
description: We shall handle the nerd stuff. Elevate your digital presence with our expert development and hosting services. From web to mobile to desktop, we deliver tailored solutions for optimal performance.
author: Balanced Solutions Software
language: en

# URL
url: https://blog.balasolu.com
root: /

# Directory
source_dir: content
posts_dir: posts
static_dir: static
public_dir: public

# Writing
render_drafts: false
highlight_theme: base16-ocean.dark
line_numbers: false

# Feed
feed_limit: 20

# Presentation
font_family: Akshar
nav:
  - name: Home
    href: https://balasolu.com
  - name: Blog
    href: /
background:
  src: https://balasolu.com/jwt.webp
  alt: jwt
shell:
  backdrop_padding: 2rem
  backdrop_opacity: 0.9
  wrapper_gap: 0.75rem
  overlay: true
  max_width: 100%

# Analytics (can also be injected with --analytics-id / BLOG_GA_MEASUREMENT_ID)
analytics:
  measurement_id:
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A site already exists at {:?}", target_dir);
    }

    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
description: The first post on the new blog.
---

Welcome! Posts live in `content/posts` as markdown files with front-matter.

## Writing

```bash
$ balasolu-blog new "My New Post" --description "What it is about"
```

## Previewing

```bash
$ balasolu-blog server
```

## Publishing

```bash
$ balasolu-blog generate
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("content/posts/hello-world.md"), sample_post)?;
    tracing::debug!("Scaffolded site in {:?}", target_dir);

    Ok(())
}
