//! Embedded HTML/CSS/JS frontend for the fraudlens dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>fraudlens Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app {
  max-width: 1100px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 {
  font-size: 22px;
  font-weight: 600;
}

header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}

.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }
.badge.err { border-color: var(--red); color: var(--red); }

nav {
  display: flex;
  gap: 4px;
  margin-bottom: 24px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}

nav button {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
}

nav button:hover { color: var(--text); background: rgba(255,255,255,0.04); }
nav button.active { color: var(--text); background: rgba(88,166,255,0.15); }

.view { display: none; }
.view.active { display: block; }

.cards { display: flex; gap: 12px; margin-bottom: 20px; }
.card {
  flex: 1;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}
.card .value { font-size: 24px; font-weight: 600; }
.card .label { color: var(--text-muted); font-size: 12px; }

.panel {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  margin-bottom: 20px;
}
.panel h2 { font-size: 15px; margin-bottom: 12px; }
.panel .note { color: var(--text-muted); font-size: 12px; margin-bottom: 8px; }

table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-weight: 500; }
td.num, th.num { text-align: right; font-family: var(--mono); }

/* Chat */
#chat-log {
  height: 380px;
  overflow-y: auto;
  display: flex;
  flex-direction: column;
  gap: 10px;
  padding: 12px;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  margin-bottom: 12px;
}

.msg { max-width: 80%; padding: 8px 12px; border-radius: var(--radius); white-space: pre-wrap; }
.msg.user { align-self: flex-end; background: rgba(88,166,255,0.18); }
.msg.assistant { align-self: flex-start; background: var(--surface); border: 1px solid var(--border); }
.msg.pending { color: var(--text-muted); font-style: italic; }
.msg .who { display: block; font-size: 11px; color: var(--text-muted); margin-bottom: 2px; }

.chat-input { display: flex; gap: 8px; }
.chat-input input {
  flex: 1;
  padding: 10px 12px;
  border-radius: var(--radius);
  border: 1px solid var(--border);
  background: var(--surface);
  color: var(--text);
  font-size: 14px;
}
.chat-input button {
  padding: 10px 18px;
  border: none;
  border-radius: var(--radius);
  background: var(--accent);
  color: #0d1117;
  font-weight: 600;
  cursor: pointer;
}
.chat-input button:disabled { opacity: 0.5; cursor: wait; }

.chat-warning { color: var(--yellow); font-size: 12px; margin-top: 8px; }
</style>
</head>
<body>
<div class="app">
  <header>
    <div>
      <h1><span class="logo">fraudlens</span> AI Credit Card Fraud Analysis</h1>
      <div class="subtitle">Explore the data, chat with an AI assistant, and get insights on the dataset.</div>
    </div>
    <span class="badge" id="chat-badge">checking&hellip;</span>
  </header>

  <nav>
    <button data-view="dashboard" class="active">Dashboard</button>
    <button data-view="explorer">Data Explorer</button>
    <button data-view="chat">AI Chat</button>
  </nav>

  <section id="view-dashboard" class="view active">
    <div class="cards">
      <div class="card"><div class="value" id="stat-rows">&ndash;</div><div class="label">Rows</div></div>
      <div class="card"><div class="value" id="stat-cols">&ndash;</div><div class="label">Columns</div></div>
      <div class="card"><div class="value" id="stat-source">&ndash;</div><div class="label">Source</div></div>
    </div>
    <div class="panel">
      <h2>Sample data</h2>
      <div class="note">First rows of the loaded dataset.</div>
      <table id="head-table"></table>
    </div>
  </section>

  <section id="view-explorer" class="view">
    <div class="panel">
      <h2>Columns</h2>
      <table id="columns-table"></table>
    </div>
    <div class="panel">
      <h2>Descriptive statistics</h2>
      <div class="note">Numeric columns only.</div>
      <table id="describe-table"></table>
    </div>
  </section>

  <section id="view-chat" class="view">
    <div class="panel">
      <h2>Chat with AI about the Dataset</h2>
      <div id="chat-log"></div>
      <div class="chat-input">
        <input id="chat-text" type="text"
               placeholder="What would you like to know about the credit card fraud data?">
        <button id="chat-send">Send</button>
      </div>
      <div class="chat-warning" id="chat-warning" hidden></div>
    </div>
  </section>
</div>

<script>
const $ = (sel) => document.querySelector(sel);

// --- navigation ------------------------------------------------------------

document.querySelectorAll('nav button').forEach(btn => {
  btn.addEventListener('click', () => {
    document.querySelectorAll('nav button').forEach(b => b.classList.remove('active'));
    document.querySelectorAll('.view').forEach(v => v.classList.remove('active'));
    btn.classList.add('active');
    $('#view-' + btn.dataset.view).classList.add('active');
  });
});

// --- rendering helpers -----------------------------------------------------

function renderTable(el, header, rows, numericFrom) {
  const th = header.map((h, i) =>
    `<th${i >= numericFrom ? ' class="num"' : ''}>${escapeHtml(h)}</th>`).join('');
  const body = rows.map(row =>
    '<tr>' + row.map((c, i) =>
      `<td${i >= numericFrom ? ' class="num"' : ''}>${escapeHtml(String(c))}</td>`).join('') +
    '</tr>').join('');
  el.innerHTML = `<tr>${th}</tr>${body}`;
}

function escapeHtml(s) {
  return s.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');
}

function fmt(x) {
  if (typeof x !== 'number' || !isFinite(x)) return 'NaN';
  return Math.abs(x) >= 1000 ? x.toFixed(1) : x.toFixed(4);
}

// --- dataset views ---------------------------------------------------------

async function loadOverview() {
  const data = await (await fetch('/api/overview')).json();
  $('#stat-rows').textContent = data.rows.toLocaleString();
  $('#stat-cols').textContent = data.columns;
  $('#stat-source').textContent = data.source.split('/').pop();
  renderTable($('#head-table'), data.head.header, data.head.rows, data.head.header.length);
  renderTable($('#columns-table'),
    ['column', 'type', 'non-null'],
    data.column_info.map(c => [c.name, c.dtype, c.non_null]), 2);
}

async function loadDescribe() {
  const data = await (await fetch('/api/describe')).json();
  renderTable($('#describe-table'),
    ['column', 'count', 'mean', 'std', 'min', '25%', '50%', '75%', 'max'],
    data.stats.map(s => [s.name, s.count, fmt(s.mean), fmt(s.std), fmt(s.min),
                         fmt(s.q25), fmt(s.median), fmt(s.q75), fmt(s.max)]), 1);
}

async function loadHealth() {
  const h = await (await fetch('/api/health')).json();
  const badge = $('#chat-badge');
  if (h.chat_available) {
    badge.textContent = 'assistant ready';
    badge.className = 'badge ok';
  } else {
    badge.textContent = 'assistant unavailable';
    badge.className = 'badge err';
    const warning = $('#chat-warning');
    warning.hidden = false;
    warning.textContent = h.session_error || 'assistant not configured';
  }
  if (h.configure_error) {
    const warning = $('#chat-warning');
    warning.hidden = false;
    warning.textContent = h.configure_error;
  }
}

// --- chat ------------------------------------------------------------------

function appendMessage(role, content, pending) {
  const log = $('#chat-log');
  const div = document.createElement('div');
  div.className = 'msg ' + role + (pending ? ' pending' : '');
  const who = document.createElement('span');
  who.className = 'who';
  who.textContent = role;
  div.appendChild(who);
  div.appendChild(document.createTextNode(content));
  log.appendChild(div);
  log.scrollTop = log.scrollHeight;
  return div;
}

async function loadTranscript() {
  const data = await (await fetch('/api/transcript')).json();
  $('#chat-log').innerHTML = '';
  data.entries.forEach(e => appendMessage(e.role, e.content, false));
}

async function sendChat() {
  const input = $('#chat-text');
  const button = $('#chat-send');
  const message = input.value.trim();
  if (!message) return;

  input.value = '';
  input.disabled = true;
  button.disabled = true;
  appendMessage('user', message, false);
  const pending = appendMessage('assistant', 'thinking…', true);

  try {
    const resp = await fetch('/api/chat', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ message }),
    });
    const data = await resp.json();
    pending.remove();
    appendMessage('assistant', data.reply || data.error || 'no reply', false);
    if (data.fallback && data.error) {
      const warning = $('#chat-warning');
      warning.hidden = false;
      warning.textContent = data.error;
    }
  } catch (e) {
    pending.remove();
    appendMessage('assistant', 'Request failed: ' + e, false);
  } finally {
    input.disabled = false;
    button.disabled = false;
    input.focus();
  }
}

$('#chat-send').addEventListener('click', sendChat);
$('#chat-text').addEventListener('keydown', e => { if (e.key === 'Enter') sendChat(); });

// --- boot ------------------------------------------------------------------

loadOverview();
loadDescribe();
loadTranscript();
loadHealth();
</script>
</body>
</html>
"##;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
