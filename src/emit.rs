//! Emitter for Emadocs Compiler
//!
//! One pass over the syntax tree, appending to three independent buffers:
//! markup, style and script. Handlers never read sibling or parent output.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ast::{ComponentNode, Construct, EventNode, ExportNode, HookNode, ImportNode, Node, Program};

lazy_static! {
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref ACRONYM_BOUNDARY: Regex = Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitOutput {
    pub markup: String,
    pub style: String,
    pub script: String,
}

/// Emit all three outputs for a program.
pub fn emit(program: &Program) -> EmitOutput {
    let mut emitter = Emitter::default();
    for node in &program.statements {
        emitter.emit_node(node);
    }
    EmitOutput {
        markup: emitter.markup,
        style: emitter.style,
        script: emitter.script,
    }
}

#[derive(Default)]
struct Emitter {
    markup: String,
    style: String,
    script: String,
}

impl Emitter {
    fn emit_node(&mut self, node: &Node) {
        match node {
            Node::Page(page) => self.emit_page(page),
            Node::Component(component) => self.emit_component(component),
            Node::Style(style) => self.emit_style(style),
            Node::Event(event) => self.emit_event(event),
            Node::State(state) => self.emit_state(state),
            Node::Api(api) => self.emit_api(api),
            Node::Router(_) => self.emit_router(),
            Node::Layout(layout) => self.emit_layout(layout),
            Node::Animation(animation) => self.emit_animation(animation),
            Node::Type(ty) => self.emit_type(&ty.construct),
            Node::Hook(hook) => self.emit_hook(hook),
            Node::Plugin(plugin) => self.emit_plugin(plugin),
            Node::Config(_) => self.emit_config(),
            Node::Import(import) => self.emit_import(import),
            Node::Export(export) => self.emit_export(export),
            // Reserved for markup-body rendering.
            Node::Route(_) | Node::Element(_) | Node::Text(_) | Node::Expression(_) => {}
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // MARKUP
    // ═══════════════════════════════════════════════════════════════════════════════

    fn emit_page(&mut self, page: &Construct) {
        self.markup.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        self.markup.push_str("  <meta charset=\"UTF-8\">\n");
        self.markup.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        if let Some(title) = page.attribute("title") {
            self.markup.push_str(&format!("  <title>{}</title>\n", title));
        }
        for sheet in ["css/theme.css", "css/emadocs.css", "styles.css"] {
            self.markup
                .push_str(&format!("  <link rel=\"stylesheet\" href=\"{}\">\n", sheet));
        }
        self.markup.push_str("</head>\n<body>\n");

        for child in &page.children {
            self.emit_node(child);
        }

        for script in ["js/emadocs.js", "script.js"] {
            self.markup
                .push_str(&format!("  <script src=\"{}\"></script>\n", script));
        }
        self.markup.push_str("</body>\n</html>");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // COMPONENTS
    // ═══════════════════════════════════════════════════════════════════════════════

    fn emit_component(&mut self, component: &ComponentNode) {
        let name = &component.construct.name;
        let class_name = name.to_lowercase();
        let element_class = format!("Ema{}", capitalize(name));

        self.style.push_str(&format!(
            "/* {} Component */\n.ema-{} {{\n  display: block;\n  position: relative;\n  box-sizing: border-box;\n}}\n\n",
            name, class_name
        ));

        let script = &mut self.script;
        script.push_str(&format!(
            "class {} extends HTMLElement {{\n  constructor() {{\n    super();\n    this.attachShadow({{ mode: 'open' }});\n  }}\n\n",
            element_class
        ));
        script.push_str(
            "  connectedCallback() {\n    this.render();\n    this.setupEventListeners();\n  }\n\n",
        );
        script.push_str("  render() {\n    this.shadowRoot.innerHTML = this.getTemplate();\n  }\n\n");
        script.push_str(&format!(
            "  getTemplate() {{\n    return `\n      <div class=\"ema-{}\">\n        <slot></slot>\n      </div>\n    `;\n  }}\n\n",
            class_name
        ));
        script.push_str("  setupEventListeners() {\n    // Event listeners will be added here\n  }\n}\n\n");
        script.push_str(&format!(
            "customElements.define('{}', {});\n",
            custom_element_tag(name),
            element_class
        ));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // STYLE
    // ═══════════════════════════════════════════════════════════════════════════════

    fn emit_style(&mut self, style: &Construct) {
        self.style.push_str(&format!(
            "/* {0} Styles */\n.{0} {{\n  /* Styles will be generated here */\n}}\n\n",
            style.name
        ));
    }

    fn emit_animation(&mut self, animation: &Construct) {
        self.style.push_str(&format!(
            "@keyframes {} {{\n  /* Keyframes will be generated here */\n}}\n\n",
            animation.name
        ));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SCRIPT
    // ═══════════════════════════════════════════════════════════════════════════════

    fn emit_event(&mut self, event: &EventNode) {
        let event_type = &event.construct.name;
        let target = event.target.as_deref().unwrap_or_default();
        self.script.push_str(&format!(
            "// Event: {0} on {1}\ndocument.addEventListener('{0}', (event) => {{\n  // Event handler code\n}});\n",
            event_type, target
        ));
    }

    fn emit_state(&mut self, state: &Construct) {
        self.script.push_str(&format!(
            "// State: {0}\nconst {0} = {{\n  // State properties will be generated here\n}};\n",
            state.name
        ));
    }

    fn emit_api(&mut self, api: &Construct) {
        self.script.push_str(&format!(
            "// API: {0}\nclass {0} {{\n  constructor() {{\n    this.baseUrl = '';\n  }}\n\n  // API methods will be generated here\n}}\n",
            api.name
        ));
    }

    fn emit_router(&mut self) {
        self.script.push_str(concat!(
            "// Router\n",
            "class EmadocsRouter {\n",
            "  constructor() {\n",
            "    this.routes = new Map();\n",
            "    this.init();\n",
            "  }\n\n",
            "  init() {\n",
            "    window.addEventListener('popstate', () => this.handleRoute());\n",
            "    this.handleRoute();\n",
            "  }\n\n",
            "  handleRoute() {\n",
            "    const path = window.location.pathname;\n",
            "    // Route handling logic\n",
            "  }\n",
            "}\n",
        ));
    }

    fn emit_layout(&mut self, layout: &Construct) {
        self.script.push_str(&format!(
            "// Layout: {}\n// Layout implementation will be generated here\n",
            layout.name
        ));
    }

    fn emit_type(&mut self, ty: &Construct) {
        self.script.push_str(&format!(
            "// Type: {}\n// Type definition will be generated here\n",
            ty.name
        ));
    }

    fn emit_hook(&mut self, hook: &HookNode) {
        self.script.push_str(&format!(
            "function use{}() {{\n  // Hook implementation\n}}\n",
            capitalize(&hook.construct.name)
        ));
    }

    fn emit_plugin(&mut self, plugin: &Construct) {
        self.script.push_str(&format!(
            "class {} {{\n  constructor() {{\n    // Plugin initialization\n  }}\n}}\n",
            plugin.name
        ));
    }

    fn emit_config(&mut self) {
        self.script
            .push_str("const config = {\n  // Configuration will be generated here\n};\n");
    }

    fn emit_import(&mut self, import: &ImportNode) {
        let line = match (import.specifiers.is_empty(), &import.source) {
            // Side-effect import.
            (true, Some(source)) => format!("import '{}';\n", source),
            _ => format!(
                "import {}{};\n",
                specifier_list(&import.specifiers),
                from_clause(import.source.as_deref())
            ),
        };
        self.script.push_str(&line);
    }

    fn emit_export(&mut self, export: &ExportNode) {
        self.script.push_str(&format!(
            "export {}{}{};\n",
            if export.is_default { "default " } else { "" },
            specifier_list(&export.specifiers),
            from_clause(export.source.as_deref())
        ));
    }
}

fn specifier_list(specifiers: &[String]) -> String {
    match specifiers {
        [] => "{}".to_string(),
        [single] => single.clone(),
        many => format!("{{ {} }}", many.join(", ")),
    }
}

fn from_clause(source: Option<&str>) -> String {
    source
        .map(|s| format!(" from '{}'", s))
        .unwrap_or_default()
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Custom element tag for a component name: `MyButton` becomes `ema-my-button`.
pub fn custom_element_tag(name: &str) -> String {
    let spaced = ACRONYM_BOUNDARY.replace_all(name, "$1-$2");
    let spaced = CAMEL_BOUNDARY.replace_all(&spaced, "$1-$2");
    let kebab = spaced.replace('_', "-").to_lowercase();
    format!("ema-{}", kebab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_only_touches_first_char() {
        assert_eq!(capitalize("counter"), "Counter");
        assert_eq!(capitalize("myHook"), "MyHook");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclair"), "Éclair");
    }

    #[test]
    fn custom_element_tags_are_kebab_case() {
        assert_eq!(custom_element_tag("Foo"), "ema-foo");
        assert_eq!(custom_element_tag("MyButton"), "ema-my-button");
        assert_eq!(custom_element_tag("HTMLView"), "ema-html-view");
        assert_eq!(custom_element_tag("nav_bar"), "ema-nav-bar");
        assert_eq!(custom_element_tag("Card2Deck"), "ema-card2-deck");
    }

    #[test]
    fn specifier_list_shapes() {
        assert_eq!(specifier_list(&[]), "{}");
        assert_eq!(specifier_list(&["A".into()]), "A");
        assert_eq!(specifier_list(&["A".into(), "B".into()]), "{ A, B }");
    }
}
