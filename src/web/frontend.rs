//! Embedded HTML/CSS/JS frontend for the sfs-report dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>SFS Execution Report</title>
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
  --purple: #bc8cff;
  --cyan: #39d2c0;
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

/* Layout */
.app {
  max-width: 1200px;
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
  font-size: 24px;
  font-weight: 600;
  display: flex;
  align-items: center;
  gap: 10px;
}

header h1 .logo {
  color: var(--accent);
  font-family: var(--mono);
  font-weight: 700;
}

header .subtitle {
  color: var(--text-muted);
  font-size: 13px;
}

/* Navigation */
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
  transition: all 0.15s;
}

nav button:hover { color: var(--text); background: rgba(255,255,255,0.04); }
nav button.active { background: var(--accent); color: #fff; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}

.card h2 {
  font-size: 16px;
  font-weight: 600;
  margin-bottom: 16px;
}

.card-head {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 12px;
  margin-bottom: 16px;
}

.card-head h2 { margin-bottom: 0; }

/* KPI grid */
.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
  gap: 16px;
  margin-bottom: 16px;
}

.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
}

.stat-card .value {
  font-size: 28px;
  font-weight: 700;
  font-family: var(--mono);
  color: var(--accent);
  line-height: 1.1;
}

.stat-card .value.small { font-size: 18px; }
.stat-card .value.green { color: var(--green); }
.stat-card .value.red { color: var(--red); }
.stat-card .value.purple { color: var(--purple); }
.stat-card .value.cyan { color: var(--cyan); }

.stat-card .label {
  font-size: 12px;
  color: var(--text-muted);
  margin-top: 6px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}

/* Health banner */
.health {
  padding: 14px 20px;
  border-radius: var(--radius);
  border: 1px solid var(--border);
  font-weight: 600;
  margin-bottom: 16px;
}

.health.good { border-color: var(--green); color: var(--green); }
.health.moderate { border-color: var(--yellow); color: var(--yellow); }
.health.poor { border-color: var(--red); color: var(--red); }

/* Horizontal bars */
.hbar-row {
  display: grid;
  grid-template-columns: 200px 1fr 110px;
  align-items: center;
  gap: 12px;
  padding: 4px 0;
  font-size: 13px;
}

.hbar-row .name {
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}

.hbar-track {
  background: rgba(255,255,255,0.04);
  border-radius: 4px;
  height: 18px;
}

.hbar {
  height: 100%;
  border-radius: 4px;
  background: var(--accent);
  min-width: 2px;
  transition: width 0.4s;
}

.hbar.passed { background: var(--green); }
.hbar.failed { background: var(--red); }
.hbar-row .num { text-align: right; font-family: var(--mono); color: var(--text-muted); }

/* Tables */
.table-wrap { overflow-x: auto; max-height: 480px; overflow-y: auto; }

table {
  width: 100%;
  border-collapse: collapse;
  font-size: 13px;
}

th, td {
  text-align: left;
  padding: 8px 12px;
  border-bottom: 1px solid var(--border);
  white-space: nowrap;
}

th {
  color: var(--text-muted);
  font-weight: 500;
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
  position: sticky;
  top: 0;
  background: var(--surface);
}

td.num { text-align: right; font-family: var(--mono); }
th.num { text-align: right; }

tr:hover { background: rgba(255,255,255,0.02); }

/* Controls */
.controls {
  display: flex;
  flex-wrap: wrap;
  align-items: center;
  gap: 16px;
  margin-bottom: 16px;
  font-size: 13px;
  color: var(--text-muted);
}

.controls label { display: inline-flex; align-items: center; gap: 6px; }

input[type="number"], select {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 6px 10px;
  font-size: 13px;
  font-family: var(--mono);
  width: 100px;
}

input[type="range"] { width: 240px; }

input:focus, select:focus {
  outline: none;
  border-color: var(--accent);
}

.btn {
  padding: 8px 18px;
  border-radius: 6px;
  border: 1px solid var(--border);
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
  transition: all 0.15s;
}

.btn:hover { border-color: var(--accent); color: var(--accent); }
.btn.primary { background: var(--accent); color: #fff; border-color: var(--accent); }
.btn.primary:hover { opacity: 0.85; }

/* Toast */
.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 12px 20px;
  border-radius: var(--radius);
  background: var(--green);
  color: #fff;
  font-size: 13px;
  font-weight: 500;
  transform: translateY(100px);
  opacity: 0;
  transition: all 0.3s;
  z-index: 1000;
}

.toast.show { transform: translateY(0); opacity: 1; }
.toast.error { background: var(--red); }

/* Panels */
.panel { display: none; }
.panel.active { display: block; }

.empty {
  text-align: center;
  padding: 40px 20px;
  color: var(--text-muted);
}
</style>
</head>
<body>
<div class="app">

  <header>
    <div>
      <h1><span class="logo">sfs</span> Execution Report</h1>
      <div class="subtitle" id="source-info">Loading...</div>
    </div>
    <button class="btn primary" id="btn-reload">Reload CSV</button>
  </header>

  <nav id="nav">
    <button class="active" data-panel="brief">Brief Summary</button>
    <button data-panel="detailed">Detailed Summary</button>
    <button data-panel="records">Records</button>
  </nav>

  <!-- ================================================================== -->
  <!-- Brief Summary -->
  <!-- ================================================================== -->
  <div class="panel active" id="panel-brief">
    <div class="stats-grid">
      <div class="stat-card"><div class="value" id="kpi-total">-</div><div class="label">Total Test Cases</div></div>
      <div class="stat-card"><div class="value green" id="kpi-passed">-</div><div class="label">Passed</div></div>
      <div class="stat-card"><div class="value red" id="kpi-failed">-</div><div class="label">Failed</div></div>
      <div class="stat-card"><div class="value cyan" id="kpi-pass-pct">-</div><div class="label">Pass Rate</div></div>
      <div class="stat-card"><div class="value small purple" id="kpi-time">-</div><div class="label">Total Execution Time</div></div>
      <div class="stat-card"><div class="value" id="kpi-first">-</div><div class="label">First Run</div></div>
      <div class="stat-card"><div class="value" id="kpi-repeated">-</div><div class="label">Repeated</div></div>
    </div>

    <div class="health" id="health-banner">Execution health: -</div>

    <div class="card">
      <div class="card-head">
        <h2>Execution Count Explorer</h2>
        <div class="controls" style="margin-bottom:0">
          <label><input type="checkbox" id="repeated-only"> Repeated only</label>
          <label>Executed <input type="range" id="count-slider" min="1" max="1" value="1"> <span id="count-value">1</span> time(s)</label>
        </div>
      </div>
      <div class="table-wrap"><table id="bucket-table"></table></div>
      <div class="empty" id="bucket-empty" style="display:none">No test cases executed that many times.</div>
    </div>

    <div class="card">
      <h2>Duplicate Summary</h2>
      <table>
        <thead><tr><th class="num">Duplicate Count</th><th class="num">Rows</th><th class="num">Test Cases</th></tr></thead>
        <tbody id="summary-body"></tbody>
      </table>
    </div>
  </div>

  <!-- ================================================================== -->
  <!-- Detailed Summary -->
  <!-- ================================================================== -->
  <div class="panel" id="panel-detailed">
    <div class="card">
      <h2>Status Distribution</h2>
      <div id="status-bars"></div>
    </div>

    <div class="card">
      <h2>Slowest Test Cases</h2>
      <div class="controls">
        <span>Status:</span>
        <span id="status-filters"></span>
        <label>Top <input type="number" id="top-n" min="1" value="15"></label>
        <label>Min seconds <input type="number" id="min-seconds" min="0" placeholder="any"></label>
      </div>
      <div id="slow-bars"></div>
      <div class="table-wrap" style="margin-top:16px">
        <table>
          <thead><tr><th>Test Case</th><th>Status</th><th class="num">Elapsed</th><th>Duration</th></tr></thead>
          <tbody id="slow-body"></tbody>
        </table>
      </div>
      <div class="empty" id="slow-empty" style="display:none">No test cases match the selected filters.</div>
    </div>
  </div>

  <!-- ================================================================== -->
  <!-- Records -->
  <!-- ================================================================== -->
  <div class="panel" id="panel-records">
    <div class="card">
      <div class="card-head">
        <h2 id="records-title">Records</h2>
        <select id="records-view">
          <option value="final">Final set</option>
          <option value="cleaned">Cleaned</option>
          <option value="duplicates">Duplicates</option>
        </select>
      </div>
      <div class="table-wrap"><table id="records-table"></table></div>
    </div>
  </div>

</div>

<!-- Toast -->
<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let currentPanel = 'brief';
let summaryData = null;
let selectedStatuses = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path) {
  const res = await fetch(path, { method });
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || res.statusText);
  return data;
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function fmt(n) {
  if (n === undefined || n === null) return '-';
  return n.toLocaleString();
}

function esc(s) {
  const d = document.createElement('div');
  d.textContent = s === null || s === undefined ? '' : String(s);
  return d.innerHTML;
}

function renderTable(el, view) {
  const head = '<thead><tr>' + view.columns.map(c => '<th>' + esc(c) + '</th>').join('') + '</tr></thead>';
  const body = '<tbody>' + view.rows.map(r =>
    '<tr>' + r.map(c => '<td>' + esc(c) + '</td>').join('') + '</tr>'
  ).join('') + '</tbody>';
  el.innerHTML = head + body;
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
document.getElementById('nav').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  const panel = e.target.dataset.panel;
  if (!panel) return;

  document.querySelectorAll('nav button').forEach(b => b.classList.remove('active'));
  e.target.classList.add('active');

  document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
  document.getElementById('panel-' + panel).classList.add('active');

  currentPanel = panel;
  loadPanel(panel);
});

async function loadPanel(panel) {
  switch (panel) {
    case 'brief': return loadBrief();
    case 'detailed': return loadDetailed();
    case 'records': return loadRecords();
  }
}

// ---------------------------------------------------------------------------
// Brief Summary
// ---------------------------------------------------------------------------
async function loadBrief() {
  try {
    summaryData = await api('GET', '/api/summary');
    renderKpis(summaryData.kpis);
    await loadDuplicates();
  } catch (e) {
    toast('Failed to load summary: ' + e.message, true);
  }
}

function renderKpis(k) {
  document.getElementById('kpi-total').textContent = fmt(k.total);
  document.getElementById('kpi-passed').textContent = fmt(k.passed);
  document.getElementById('kpi-failed').textContent = fmt(k.failed);
  document.getElementById('kpi-pass-pct').textContent = k.pass_pct.toFixed(2) + '%';
  document.getElementById('kpi-time').textContent = k.total_elapsed;
  document.getElementById('kpi-first').textContent = fmt(k.first_run);
  document.getElementById('kpi-repeated').textContent = fmt(k.repeated);

  const banner = document.getElementById('health-banner');
  banner.className = 'health ' + k.health;
  banner.textContent = 'Execution health: ' + k.health.toUpperCase() + ' (' + k.pass_pct.toFixed(2) + '% passed)';
}

async function loadDuplicates() {
  const scope = document.getElementById('repeated-only').checked ? 'repeated' : 'all';
  const data = await api('GET', '/api/duplicates?scope=' + scope);

  document.getElementById('summary-body').innerHTML = data.summary.map(r =>
    '<tr><td class="num">' + r.duplicate_count + '</td><td class="num">' + fmt(r.rows) +
    '</td><td class="num">' + fmt(r.test_cases) + '</td></tr>'
  ).join('');

  const slider = document.getElementById('count-slider');
  slider.min = data.min_count || 1;
  slider.max = data.max_count || 1;
  if (+slider.value < +slider.min || +slider.value > +slider.max) slider.value = slider.min;
  await loadBucket();
}

async function loadBucket() {
  const count = document.getElementById('count-slider').value;
  document.getElementById('count-value').textContent = count;
  const scope = document.getElementById('repeated-only').checked ? 'repeated' : 'all';
  const data = await api('GET', '/api/duplicates/bucket?count=' + count + '&scope=' + scope);
  renderTable(document.getElementById('bucket-table'), data.table);
  document.getElementById('bucket-empty').style.display = data.found ? 'none' : 'block';
}

document.getElementById('repeated-only').addEventListener('change', () => loadDuplicates());
document.getElementById('count-slider').addEventListener('input', () => loadBucket());

// ---------------------------------------------------------------------------
// Detailed Summary
// ---------------------------------------------------------------------------
async function loadDetailed() {
  try {
    if (!summaryData) summaryData = await api('GET', '/api/summary');
    renderStatusBars(summaryData.status_distribution);
    renderStatusFilters(summaryData.status_options);
    await loadSlowest();
  } catch (e) {
    toast('Failed to load details: ' + e.message, true);
  }
}

function renderStatusBars(dist) {
  const max = Math.max(1, ...dist.map(d => d.count));
  document.getElementById('status-bars').innerHTML = dist.map(d =>
    '<div class="hbar-row"><span class="name">' + esc(d.status) + '</span>' +
    '<div class="hbar-track"><div class="hbar ' + esc(d.status.toLowerCase()) + '" style="width:' +
    (d.count / max * 100) + '%"></div></div><span class="num">' + fmt(d.count) + '</span></div>'
  ).join('');
}

function renderStatusFilters(statuses) {
  if (selectedStatuses === null) selectedStatuses = new Set(statuses);
  document.getElementById('status-filters').innerHTML = statuses.map(s =>
    '<label><input type="checkbox" value="' + esc(s) + '"' + (selectedStatuses.has(s) ? ' checked' : '') +
    '> ' + esc(s) + '</label>'
  ).join(' ');
}

document.getElementById('status-filters').addEventListener('change', e => {
  if (e.target.type !== 'checkbox') return;
  if (e.target.checked) selectedStatuses.add(e.target.value);
  else selectedStatuses.delete(e.target.value);
  loadSlowest();
});

async function loadSlowest() {
  const params = new URLSearchParams();
  params.set('status', Array.from(selectedStatuses || []).join(','));
  params.set('top', document.getElementById('top-n').value || '15');
  const min = document.getElementById('min-seconds').value;
  if (min !== '') params.set('min_seconds', min);

  const data = await api('GET', '/api/slowest?' + params.toString());
  document.getElementById('top-n').value = data.top;

  const entries = data.entries;
  const max = Math.max(1, ...entries.map(e => e.elapsed_seconds || 0));
  document.getElementById('slow-bars').innerHTML = entries.map(e =>
    '<div class="hbar-row"><span class="name" title="' + esc(e.process_name) + '">' + esc(e.process_name) + '</span>' +
    '<div class="hbar-track"><div class="hbar ' + esc(e.status.toLowerCase()) + '" style="width:' +
    ((e.elapsed_seconds || 0) / max * 100) + '%"></div></div><span class="num">' + esc(e.elapsed) + '</span></div>'
  ).join('');

  document.getElementById('slow-body').innerHTML = entries.map(e =>
    '<tr><td>' + esc(e.process_name) + '</td><td>' + esc(e.status) + '</td><td class="num">' +
    esc(e.elapsed) + '</td><td>' + esc(e.elapsed_human) + '</td></tr>'
  ).join('');
  document.getElementById('slow-empty').style.display = entries.length ? 'none' : 'block';
}

document.getElementById('top-n').addEventListener('change', () => loadSlowest());
document.getElementById('min-seconds').addEventListener('change', () => loadSlowest());

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------
async function loadRecords() {
  const view = document.getElementById('records-view').value;
  try {
    const data = await api('GET', '/api/records?view=' + view);
    document.getElementById('records-title').textContent = 'Records (' + fmt(data.rows.length) + ')';
    renderTable(document.getElementById('records-table'), data);
  } catch (e) {
    toast('Failed to load records: ' + e.message, true);
  }
}

document.getElementById('records-view').addEventListener('change', () => loadRecords());

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const h = await api('GET', '/api/health');
    document.getElementById('source-info').textContent =
      h.source + ' - ' + fmt(h.cleaned_rows) + ' rows, ' + fmt(h.final_rows) +
      ' in final set - loaded ' + h.loaded_at;
  } catch (e) {
    document.getElementById('source-info').textContent = 'Report unavailable';
  }
}

document.getElementById('btn-reload').addEventListener('click', async () => {
  try {
    const res = await api('POST', '/api/reload');
    toast('Reloaded ' + fmt(res.rows) + ' rows');
    summaryData = null;
    selectedStatuses = null;
    await loadHealth();
    await loadPanel(currentPanel);
  } catch (e) {
    toast('Reload failed: ' + e.message, true);
  }
});

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
loadHealth();
loadPanel(currentPanel);
</script>
</body>
</html>
"##;
