pub const INDEX_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Image Captioning and Story Generation</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            display: flex;
            justify-content: center;
            padding: 20px;
        }

        .container {
            background: white;
            border-radius: 20px;
            box-shadow: 0 20px 60px rgba(0,0,0,0.3);
            max-width: 800px;
            width: 100%;
            padding: 40px;
        }

        h1 {
            color: #333;
            margin-bottom: 10px;
            font-size: 2em;
        }

        h2 {
            color: #667eea;
            font-size: 1em;
            text-transform: uppercase;
            letter-spacing: 1px;
            margin: 30px 0 15px;
        }

        .upload-area {
            border: 3px dashed #667eea;
            border-radius: 15px;
            padding: 40px 20px;
            text-align: center;
            cursor: pointer;
            background: #f8f9ff;
        }

        .upload-area:hover {
            border-color: #764ba2;
            background: #f0f2ff;
        }

        .upload-text {
            color: #667eea;
            font-size: 1.2em;
            font-weight: 600;
        }

        .upload-hint {
            color: #999;
            font-size: 0.9em;
        }

        input[type="file"] {
            display: none;
        }

        .images {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(200px, 1fr));
            gap: 15px;
            margin-top: 20px;
        }

        .images img {
            width: 100%;
            border-radius: 10px;
        }

        .caption {
            color: #333;
            font-size: 0.9em;
        }

        .badge {
            display: inline-block;
            background: #667eea;
            color: white;
            padding: 2px 10px;
            border-radius: 20px;
            font-size: 0.75em;
            font-weight: 600;
        }

        label {
            display: block;
            color: #666;
            font-size: 0.85em;
            margin: 10px 0 4px;
        }

        input[type="text"], input[type="number"], textarea, select {
            width: 100%;
            padding: 8px;
            border: 2px solid #e0e0e0;
            border-radius: 8px;
            font-size: 0.95em;
        }

        button {
            background: #667eea;
            color: white;
            border: none;
            border-radius: 20px;
            padding: 10px 24px;
            font-weight: 600;
            cursor: pointer;
            margin-top: 15px;
        }

        button:disabled {
            background: #aaa;
        }

        .result {
            background: #f8f9ff;
            border-radius: 10px;
            padding: 20px;
            margin-top: 20px;
            line-height: 1.6;
            white-space: pre-wrap;
        }

        .history-entry {
            border-top: 1px solid #e0e0e0;
            padding: 15px 0;
            font-size: 0.9em;
        }

        .warning, .error {
            background: #fee;
            border: 2px solid #fcc;
            color: #c33;
            padding: 15px;
            border-radius: 10px;
            margin-top: 20px;
            display: none;
        }

        .character-row {
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding: 4px 0;
        }

        .character-row button {
            margin: 0;
            padding: 2px 12px;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>📖 Image Captioning and Story Generation</h1>

        <div class="upload-area" id="uploadArea">
            <div class="upload-text">Upload up to 5 images</div>
            <div class="upload-hint">JPG or PNG</div>
            <input type="file" id="fileInput" accept=".jpg,.jpeg,.png" multiple>
        </div>
        <div class="warning" id="warning"></div>
        <div class="images" id="images"></div>

        <h2>Story Settings</h2>
        <label for="genre">Story genre or theme (optional)</label>
        <input type="text" id="genre">
        <label for="numWords">Number of words</label>
        <input type="number" id="numWords" min="1" step="1" value="1">
        <label for="numCharacters">Number of characters</label>
        <input type="number" id="numCharacters" min="1" step="1" value="1">
        <label for="readerAge">Reader's age</label>
        <input type="number" id="readerAge" min="1" step="1" value="1">
        <label for="language">Language</label>
        <input type="text" id="language" placeholder="English">
        <label for="characterNames">Character names, separated by commas (optional)</label>
        <textarea id="characterNames"></textarea>
        <label for="characterGenders">Character genders, separated by commas (optional)</label>
        <textarea id="characterGenders"></textarea>

        <h2>Characters</h2>
        <div id="characters"></div>
        <label for="newName">Name</label>
        <input type="text" id="newName">
        <label for="newGender">Gender (required)</label>
        <input type="text" id="newGender">
        <button id="addCharacter">Add character</button>

        <div>
            <button id="generate">Generate the story!</button>
        </div>
        <div class="error" id="error"></div>
        <div class="result" id="story" style="display:none"></div>

        <h2>Story History</h2>
        <div id="history"></div>
    </div>

    <script>
        const $ = (id) => document.getElementById(id);
        let sessionId = null;
        let pdfEnabled = false;

        function showMessage(el, text) {
            el.textContent = text;
            el.style.display = text ? 'block' : 'none';
        }

        async function api(path, options = {}) {
            const response = await fetch(`/api/sessions/${sessionId}${path}`, options);
            const body = response.status === 204 ? {} : await response.json();
            if (!response.ok) {
                throw new Error(body.error || 'Request failed');
            }
            return body;
        }

        async function startSession() {
            const response = await fetch('/api/sessions', { method: 'POST' });
            const body = await response.json();
            sessionId = body.session_id;
            pdfEnabled = body.pdf_enabled;
        }

        $('uploadArea').addEventListener('click', () => $('fileInput').click());

        $('fileInput').addEventListener('change', async (e) => {
            const files = Array.from(e.target.files);
            showMessage($('warning'), '');
            $('images').innerHTML = '';
            const formData = new FormData();
            files.forEach((f) => formData.append('file', f, f.name));
            try {
                const result = await api('/images', { method: 'POST', body: formData });
                result.images.forEach((img) => {
                    const card = document.createElement('div');
                    const pic = document.createElement('img');
                    pic.src = img.preview;
                    const caption = document.createElement('div');
                    caption.className = 'caption';
                    caption.textContent = img.caption;
                    card.append(pic, caption);
                    if (img.cached) {
                        const badge = document.createElement('span');
                        badge.className = 'badge';
                        badge.textContent = 'cached';
                        card.append(badge);
                    }
                    $('images').append(card);
                });
            } catch (err) {
                showMessage($('warning'), 'Error: ' + err.message);
            }
        });

        function renderCharacters(characters) {
            $('characters').innerHTML = '';
            characters.forEach((c, i) => {
                const row = document.createElement('div');
                row.className = 'character-row';
                const text = document.createElement('span');
                text.textContent = c.gender ? `${c.name} (${c.gender})` : c.name;
                const del = document.createElement('button');
                del.textContent = 'Delete';
                del.addEventListener('click', async () => {
                    const result = await api(`/characters/${i}`, { method: 'DELETE' });
                    renderCharacters(result.characters);
                });
                row.append(text, del);
                $('characters').append(row);
            });
        }

        $('addCharacter').addEventListener('click', async () => {
            try {
                const result = await api('/characters', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ name: $('newName').value, gender: $('newGender').value }),
                });
                $('newName').value = '';
                $('newGender').value = '';
                renderCharacters(result.characters);
            } catch (err) {
                showMessage($('error'), 'Error: ' + err.message);
            }
        });

        function numberOrNull(id) {
            const v = parseInt($(id).value, 10);
            return Number.isNaN(v) ? null : v;
        }

        async function refreshHistory() {
            const result = await api('/stories');
            $('history').innerHTML = '';
            result.stories.forEach((s) => {
                const entry = document.createElement('div');
                entry.className = 'history-entry';
                const lines = [
                    `Story ${s.index + 1}`,
                    `Story Genre or Theme: ${s.genre}`,
                    `Number of Words: ${s.num_words}`,
                    `Number of Characters: ${s.num_characters}`,
                    `Reader's Age: ${s.reader_age}`,
                    `Language: ${s.language}`,
                    `Character Names: ${s.character_names.join(', ')}`,
                    `Character Genders: ${s.character_genders.join(', ')}`,
                    `Captions: ${s.image_captions.join(', ')}`,
                    `Story: ${s.story}`,
                ];
                lines.forEach((line) => {
                    const p = document.createElement('div');
                    p.textContent = line;
                    entry.append(p);
                });
                if (s.has_pdf) {
                    const link = document.createElement('a');
                    link.href = `/api/sessions/${sessionId}/stories/${s.index}/pdf`;
                    link.textContent = 'Download PDF';
                    entry.append(link);
                }
                $('history').append(entry);
            });
        }

        $('generate').addEventListener('click', async () => {
            showMessage($('error'), '');
            $('generate').disabled = true;
            try {
                const result = await api('/stories', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({
                        genre: $('genre').value,
                        num_words: numberOrNull('numWords'),
                        num_characters: numberOrNull('numCharacters'),
                        reader_age: numberOrNull('readerAge'),
                        language: $('language').value || null,
                        character_names: $('characterNames').value,
                        character_genders: $('characterGenders').value,
                    }),
                });
                showMessage($('story'), result.story);
                if (pdfEnabled && result.pdf_error) {
                    showMessage($('error'), 'PDF export failed: ' + result.pdf_error);
                }
                await refreshHistory();
            } catch (err) {
                showMessage($('error'), 'Error: ' + err.message);
            } finally {
                $('generate').disabled = false;
            }
        });

        window.addEventListener('pagehide', () => {
            if (sessionId) {
                fetch(`/api/sessions/${sessionId}`, { method: 'DELETE', keepalive: true });
            }
        });

        startSession();
    </script>
</body>
</html>
"#;
