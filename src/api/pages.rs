// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML pages
//!
//! Pages are small enough to build with `format!`. Every interpolated
//! value passes through [`escape`] first.

use axum::response::Html;

use crate::inference::{Classification, Reconstruction};

/// Message shown after a reconstruction run
pub const RECONSTRUCTION_DONE: &str = "Done with reconstruction successfully";

fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Classification</a> | <a href="/matching">Matching</a> | <a href="/reconstruction">Reconstruction</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body,
    ))
}

fn image_url(filename: &str) -> String {
    format!("/get_image/{}", escape(filename))
}

const CLASSIFY_FORM: &str = r#"<form method="post" action="/" enctype="multipart/form-data">
<input type="file" name="file" accept="image/*">
<select name="algo-sel">
<option value="svm">SVM</option>
<option value="cnn">CNN</option>
</select>
<input type="submit" value="Upload">
</form>"#;

const RECONSTRUCTION_FORM: &str = r#"<form method="post" action="/reconstruction" enctype="multipart/form-data">
<input type="file" name="file" accept="image/*">
<input type="submit" value="Upload">
</form>"#;

/// Upload form, plus the verdict when a classification just ran
pub fn index_page(result: Option<(&Classification, &str)>) -> Html<String> {
    let mut body = String::from(CLASSIFY_FORM);

    if let Some((classification, filename)) = result {
        body.push_str(&format!(
            r#"
<section class="result">
<p>Model: <strong>{model}</strong></p>
<p>Result: <strong>{label}</strong></p>
<img src="{src}" alt="{alt}">
</section>"#,
            model = escape(classification.model.display_name()),
            label = escape(classification.label.as_str()),
            src = image_url(filename),
            alt = escape(filename),
        ));
    }

    layout("Face Liveness Detection", &body)
}

pub fn matching_page() -> Html<String> {
    layout(
        "Face Matching",
        "<p>Face matching compares two captures of the same person.</p>",
    )
}

/// Upload form, plus the comparison image when a reconstruction just ran
///
/// `composite` is the stored name of the side-by-side image.
pub fn reconstruction_page(result: Option<(&Reconstruction, &str)>) -> Html<String> {
    let mut body = String::from(RECONSTRUCTION_FORM);

    if let Some((reconstruction, composite)) = result {
        body.push_str(&format!(
            r#"
<section class="result">
<p>{message}</p>
<p>Mean squared error: {mse:.6}</p>
<figure>
<img src="{src}" alt="Original and reconstruction">
<figcaption>Left: Original Image {source}. Right: Reconstructed Image</figcaption>
</figure>
</section>"#,
            message = escape(RECONSTRUCTION_DONE),
            mse = reconstruction.mean_squared_error,
            src = image_url(composite),
            source = escape(&reconstruction.source_filename),
        ));
    }

    layout("Image Reconstruction", &body)
}
