//! Server-rendered HTML pages
//!
//! Every dynamic value is escaped here except report bodies, which arrive
//! as [`SafeHtml`] from the renderer.

use crate::render::{escape_html, SafeHtml};

const HEAD: &str = r#"<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet">"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n{HEAD}\n<title>{}</title>\n</head>\n\
         <body class=\"bg-light\">\n\
         <nav class=\"navbar navbar-dark bg-primary mb-4\"><div class=\"container\">\
         <a class=\"navbar-brand\" href=\"/\">Quarry AI Research Assistant</a></div></nav>\n\
         <main class=\"container\">\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// Query form with progress polling. `error` renders a dismissable banner.
pub fn index_page(error: Option<&str>) -> String {
    let banner = match error {
        Some(message) if !message.trim().is_empty() => format!(
            "<div class=\"alert alert-danger\" role=\"alert\" id=\"error-banner\">{}</div>",
            escape_html(message)
        ),
        _ => String::new(),
    };

    let body = format!(
        r#"{banner}
<div class="card shadow-sm mb-4">
  <div class="card-body">
    <h1 class="h3 mb-3">Start a research report</h1>
    <form id="research-form">
      <div class="mb-3">
        <textarea class="form-control" id="query" name="query" rows="3"
          placeholder="e.g. Top AI healthcare startups in India"></textarea>
      </div>
      <button type="submit" class="btn btn-primary" id="start-btn">Start Research</button>
    </form>
  </div>
</div>
<div class="card shadow-sm d-none" id="progress-card">
  <div class="card-body">
    <p class="mb-2" id="progress-message">Initializing AI Research Agents...</p>
    <div class="progress">
      <div class="progress-bar progress-bar-striped progress-bar-animated" id="progress-bar"
        role="progressbar" style="width: 0%">0%</div>
    </div>
  </div>
</div>
<script>
{POLL_SCRIPT}
</script>"#
    );

    layout("Quarry AI Research Assistant", &body)
}

const POLL_SCRIPT: &str = r#"(function () {
  const form = document.getElementById('research-form');
  const card = document.getElementById('progress-card');
  const bar = document.getElementById('progress-bar');
  const message = document.getElementById('progress-message');
  const button = document.getElementById('start-btn');

  function showError(text) {
    message.textContent = text;
    bar.classList.remove('progress-bar-animated');
    bar.classList.add('bg-danger');
    button.disabled = false;
  }

  function poll(id) {
    fetch('/research_progress/' + encodeURIComponent(id))
      .then(function (r) { return r.json(); })
      .then(function (job) {
        if (job.error && !job.status) { showError(job.error); return; }
        bar.style.width = job.progress + '%';
        bar.textContent = job.progress + '%';
        message.textContent = job.message;
        if (job.status === 'completed') {
          window.location.href = '/research_result/' + encodeURIComponent(id);
        } else if (job.status === 'error') {
          showError(job.message);
        } else {
          setTimeout(function () { poll(id); }, 2000);
        }
      })
      .catch(function () { setTimeout(function () { poll(id); }, 4000); });
  }

  form.addEventListener('submit', function (event) {
    event.preventDefault();
    const query = document.getElementById('query').value;
    button.disabled = true;
    fetch('/start_research', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ query: query })
    })
      .then(function (r) { return r.json(); })
      .then(function (data) {
        card.classList.remove('d-none');
        if (data.error) { showError(data.error); return; }
        poll(data.research_id);
      })
      .catch(function (e) { card.classList.remove('d-none'); showError(String(e)); });
  });
})();"#;

/// Completed report with download links
pub fn report_page(research_id: &str, query: &str, report: &SafeHtml) -> String {
    let id = escape_html(research_id);
    let body = format!(
        r#"<div class="d-flex justify-content-between align-items-center mb-3">
  <h1 class="h4 mb-0">Research Report: {query}</h1>
  <div class="btn-group">
    <a class="btn btn-outline-primary" href="/download/markdown/{id}">Markdown</a>
    <a class="btn btn-outline-primary" href="/download/pdf/{id}">PDF</a>
    <a class="btn btn-outline-primary" href="/download/json/{id}">JSON</a>
  </div>
</div>
<article class="card shadow-sm"><div class="card-body research-content">
{report}
</div></article>
<p class="mt-4"><a href="/">Start a new research</a></p>"#,
        query = escape_html(query),
        id = id,
        report = report,
    );
    layout("Research Report", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;

    #[test]
    fn test_index_escapes_error_banner() {
        let page = index_page(Some("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.contains("<script>alert(1)"));
    }

    #[test]
    fn test_index_without_error_has_no_banner() {
        assert!(!index_page(None).contains("error-banner"));
        assert!(!index_page(Some("  ")).contains("error-banner"));
    }

    #[test]
    fn test_report_page_escapes_query_and_embeds_report() {
        let report = render("## Findings\n- **Point** one");
        let page = report_page("research_1_abc", "<b>EV</b> startups", &report);
        assert!(page.contains("Research Report: &lt;b&gt;EV&lt;/b&gt; startups"));
        assert!(page.contains(report.as_str()));
        assert!(page.contains("/download/pdf/research_1_abc"));
    }
}
