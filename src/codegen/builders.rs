//! Per-framework script builders
//!
//! Each builder accumulates emitted fragments and wraps them in its
//! framework's program skeleton. The Playwright and Puppeteer builders share
//! the async page-object shape but differ in waiting idiom: Playwright's
//! actions auto-wait, Puppeteer needs an explicit `waitForSelector` before
//! every element action. Cypress auto-awaits page stability, so navigation
//! hints are ignored there.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title used in every generated script skeleton.
const SCRIPT_TITLE: &str = "Written with WebScribe Recorder";

/// Supported target frameworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Playwright,
    Puppeteer,
    Cypress,
}

impl ScriptType {
    /// All supported frameworks, for CLI help and validation messages.
    pub const ALL: &'static [ScriptType] =
        &[ScriptType::Playwright, ScriptType::Puppeteer, ScriptType::Cypress];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptType::Playwright => "playwright",
            ScriptType::Puppeteer => "puppeteer",
            ScriptType::Cypress => "cypress",
        }
    }

    /// Construct the builder for this framework.
    pub fn builder(&self) -> Box<dyn ScriptBuilder> {
        match self {
            ScriptType::Playwright => Box::new(PlaywrightScriptBuilder::new()),
            ScriptType::Puppeteer => Box::new(PuppeteerScriptBuilder::new()),
            ScriptType::Cypress => Box::new(CypressScriptBuilder::new()),
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "playwright" => Ok(ScriptType::Playwright),
            "puppeteer" => Ok(ScriptType::Puppeteer),
            "cypress" => Ok(ScriptType::Cypress),
            other => Err(Error::Codegen(format!(
                "unknown target framework '{other}' (expected playwright, puppeteer or cypress)"
            ))),
        }
    }
}

/// One emission method per action kind, plus the skeleton wrapper.
/// `causes_navigation` asks the builder to wait for a page transition
/// alongside the action; builders whose framework auto-awaits ignore it.
pub trait ScriptBuilder {
    fn push_comments(&mut self, comment: &str);
    fn push_codes(&mut self, code: &str);
    fn click(&mut self, selector: &str, causes_navigation: bool);
    fn hover(&mut self, selector: &str, causes_navigation: bool);
    fn load(&mut self, url: &str);
    fn resize(&mut self, width: u32, height: u32);
    fn fill(&mut self, selector: &str, value: &str, causes_navigation: bool);
    fn type_text(&mut self, selector: &str, value: &str, causes_navigation: bool);
    fn select(&mut self, selector: &str, option: &str, causes_navigation: bool);
    fn keydown(&mut self, selector: &str, key: &str, causes_navigation: bool);
    fn wheel(&mut self, delta_x: f64, delta_y: f64, page_x_offset: f64, page_y_offset: f64);
    fn full_screenshot(&mut self);
    fn await_text(&mut self, text: &str);
    fn build_script(&self) -> String;
    /// The most recently pushed fragment, verbatim.
    fn latest_code(&self) -> &str;
}

/// Indented fragment accumulator shared by all builders. Comments get one
/// leading break, code lines one leading and one trailing break, so joining
/// the fragments yields the body of the skeleton directly.
#[derive(Debug, Default)]
struct Fragments {
    codes: Vec<String>,
}

impl Fragments {
    fn push_comment(&mut self, comment: &str) {
        self.codes.push(format!("\n  {comment}"));
    }

    fn push_code(&mut self, code: &str) {
        self.codes.push(format!("\n  {code}\n"));
    }

    fn joined(&self) -> String {
        self.codes.join("")
    }

    fn latest(&self) -> &str {
        self.codes.last().map(String::as_str).unwrap_or("")
    }
}

// Playwright ---------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PlaywrightScriptBuilder {
    fragments: Fragments,
}

impl PlaywrightScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn wait_for_navigation(&self) -> &'static str {
        "page.waitForNavigation()"
    }

    fn wait_for_action_and_navigation(&self, action: &str) -> String {
        format!(
            "await Promise.all([\n    {action},\n    {}\n  ]);",
            self.wait_for_navigation()
        )
    }

    fn push_action(&mut self, action: String, causes_navigation: bool) {
        let code = if causes_navigation {
            self.wait_for_action_and_navigation(&action)
        } else {
            format!("await {action};")
        };
        self.fragments.push_code(&code);
    }
}

impl ScriptBuilder for PlaywrightScriptBuilder {
    fn push_comments(&mut self, comment: &str) {
        self.fragments.push_comment(comment);
    }

    fn push_codes(&mut self, code: &str) {
        self.fragments.push_code(code);
    }

    fn click(&mut self, selector: &str, causes_navigation: bool) {
        self.push_action(format!("page.click('{selector}')"), causes_navigation);
    }

    fn hover(&mut self, selector: &str, causes_navigation: bool) {
        self.push_action(format!("page.hover('{selector}')"), causes_navigation);
    }

    fn load(&mut self, url: &str) {
        self.fragments.push_code(&format!("await page.goto('{url}');"));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.fragments.push_code(&format!(
            "await page.setViewportSize({{ width: {width}, height: {height} }});"
        ));
    }

    fn fill(&mut self, selector: &str, value: &str, causes_navigation: bool) {
        self.push_action(
            format!("page.fill('{selector}', \"{value}\")"),
            causes_navigation,
        );
    }

    fn type_text(&mut self, selector: &str, value: &str, causes_navigation: bool) {
        self.push_action(
            format!("page.type('{selector}', \"{value}\")"),
            causes_navigation,
        );
    }

    fn select(&mut self, selector: &str, option: &str, causes_navigation: bool) {
        self.push_action(
            format!("page.selectOption('{selector}', '{option}')"),
            causes_navigation,
        );
    }

    fn keydown(&mut self, selector: &str, key: &str, causes_navigation: bool) {
        self.push_action(
            format!("page.press('{selector}', '{key}')"),
            causes_navigation,
        );
    }

    fn wheel(&mut self, delta_x: f64, delta_y: f64, _page_x_offset: f64, _page_y_offset: f64) {
        self.fragments.push_code(&format!(
            "await page.mouse.wheel({}, {});",
            delta_x.floor() as i64,
            delta_y.floor() as i64
        ));
    }

    fn full_screenshot(&mut self) {
        self.fragments
            .push_code("await page.screenshot({ path: 'screenshot.png', fullPage: true });");
    }

    fn await_text(&mut self, text: &str) {
        self.fragments
            .push_code(&format!("await page.waitForSelector('text={text}');"));
    }

    fn build_script(&self) -> String {
        format!(
            "import {{ test, expect }} from '@playwright/test';\n\ntest('{SCRIPT_TITLE}', async ({{ page }}) => {{{}}});",
            self.fragments.joined()
        )
    }

    fn latest_code(&self) -> &str {
        self.fragments.latest()
    }
}

// Puppeteer ----------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PuppeteerScriptBuilder {
    fragments: Fragments,
}

impl PuppeteerScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn wait_for_selector(&self, selector: &str) -> String {
        format!("page.waitForSelector('{selector}')")
    }

    fn wait_for_navigation(&self) -> &'static str {
        "page.waitForNavigation()"
    }

    fn wait_for_selector_and_navigation(&self, selector: &str, action: &str) -> String {
        format!(
            "await {};\n  await Promise.all([\n    {action},\n    {}\n  ]);",
            self.wait_for_selector(selector),
            self.wait_for_navigation()
        )
    }

    /// Every element action is preceded by an explicit wait; `wait_selector`
    /// may be stricter than the action's own selector (enabled-state check).
    fn push_guarded(&mut self, wait_selector: &str, action: String, causes_navigation: bool) {
        let code = if causes_navigation {
            self.wait_for_selector_and_navigation(wait_selector, &action)
        } else {
            format!("await {};\n  await {action};", self.wait_for_selector(wait_selector))
        };
        self.fragments.push_code(&code);
    }
}

impl ScriptBuilder for PuppeteerScriptBuilder {
    fn push_comments(&mut self, comment: &str) {
        self.fragments.push_comment(comment);
    }

    fn push_codes(&mut self, code: &str) {
        self.fragments.push_code(code);
    }

    fn click(&mut self, selector: &str, causes_navigation: bool) {
        self.push_guarded(
            selector,
            format!("page.click('{selector}')"),
            causes_navigation,
        );
    }

    fn hover(&mut self, selector: &str, causes_navigation: bool) {
        self.push_guarded(
            selector,
            format!("page.hover('{selector}')"),
            causes_navigation,
        );
    }

    fn load(&mut self, url: &str) {
        self.fragments.push_code(&format!("await page.goto('{url}');"));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.fragments.push_code(&format!(
            "await page.setViewport({{ width: {width}, height: {height} }});"
        ));
    }

    fn fill(&mut self, selector: &str, value: &str, causes_navigation: bool) {
        // No native fill; assert the field is enabled, then type.
        self.push_guarded(
            &format!("{selector}:not([disabled])"),
            format!("page.type('{selector}', \"{value}\")"),
            causes_navigation,
        );
    }

    fn type_text(&mut self, selector: &str, value: &str, causes_navigation: bool) {
        self.push_guarded(
            selector,
            format!("page.type('{selector}', \"{value}\")"),
            causes_navigation,
        );
    }

    fn select(&mut self, selector: &str, option: &str, causes_navigation: bool) {
        self.push_guarded(
            selector,
            format!("page.select('{selector}', '{option}')"),
            causes_navigation,
        );
    }

    fn keydown(&mut self, selector: &str, key: &str, causes_navigation: bool) {
        if causes_navigation {
            let code = self
                .wait_for_selector_and_navigation(selector, &format!("page.keyboard.press('{key}')"));
            self.fragments.push_code(&code);
        } else {
            self.fragments.push_code(&format!(
                "await page.waitForSelector('{selector}');\n  await page.keyboard.press('{key}');"
            ));
        }
    }

    fn wheel(&mut self, delta_x: f64, delta_y: f64, _page_x_offset: f64, _page_y_offset: f64) {
        self.fragments.push_code(&format!(
            "await page.evaluate(() => window.scrollBy({delta_x}, {delta_y}));"
        ));
    }

    fn full_screenshot(&mut self) {
        self.fragments
            .push_code("await page.screenshot({ path: 'screenshot.png', fullPage: true });");
    }

    fn await_text(&mut self, text: &str) {
        self.fragments.push_code(&format!(
            "await page.waitForFunction(\"document.body.innerText.includes('{text}')\");"
        ));
    }

    fn build_script(&self) -> String {
        format!(
            "const puppeteer = require('puppeteer');\n(async () => {{\n  const browser = await puppeteer.launch({{\n    // headless: false, slowMo: 100, // Uncomment to visualize test\n  }});\n  const page = await browser.newPage();\n{}\n  await browser.close();\n}})();",
            self.fragments.joined()
        )
    }

    fn latest_code(&self) -> &str {
        self.fragments.latest()
    }
}

// Cypress ------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CypressScriptBuilder {
    fragments: Fragments,
}

impl CypressScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScriptBuilder for CypressScriptBuilder {
    fn push_comments(&mut self, comment: &str) {
        self.fragments.push_comment(comment);
    }

    fn push_codes(&mut self, code: &str) {
        self.fragments.push_code(code);
    }

    // Cypress automatically awaits page stability, navigation hints are moot.

    fn click(&mut self, selector: &str, _causes_navigation: bool) {
        self.fragments
            .push_code(&format!("cy.get('{selector}').click();"));
    }

    fn hover(&mut self, selector: &str, _causes_navigation: bool) {
        self.fragments
            .push_code(&format!("cy.get('{selector}').trigger('mouseover');"));
    }

    fn load(&mut self, url: &str) {
        self.fragments.push_code(&format!("cy.visit('{url}');"));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.fragments
            .push_code(&format!("cy.viewport({width}, {height});"));
    }

    fn fill(&mut self, selector: &str, value: &str, _causes_navigation: bool) {
        self.fragments
            .push_code(&format!("cy.get('{selector}').type(\"{value}\");"));
    }

    fn type_text(&mut self, selector: &str, value: &str, _causes_navigation: bool) {
        self.fragments
            .push_code(&format!("cy.get('{selector}').type(\"{value}\");"));
    }

    fn select(&mut self, selector: &str, option: &str, _causes_navigation: bool) {
        self.fragments
            .push_code(&format!("cy.get('{selector}').select('{option}');"));
    }

    fn keydown(&mut self, selector: &str, key: &str, _causes_navigation: bool) {
        self.fragments
            .push_code(&format!("cy.get('{selector}').type('{{{key}}}');"));
    }

    fn wheel(&mut self, _delta_x: f64, _delta_y: f64, page_x_offset: f64, page_y_offset: f64) {
        self.fragments
            .push_code(&format!("cy.scrollTo({page_x_offset}, {page_y_offset});"));
    }

    fn full_screenshot(&mut self) {
        self.fragments.push_code("cy.screenshot();");
    }

    fn await_text(&mut self, text: &str) {
        self.fragments.push_code(&format!("cy.contains('{text}');"));
    }

    fn build_script(&self) -> String {
        format!(
            "it('{SCRIPT_TITLE}', () => {{{}}});",
            self.fragments.joined()
        )
    }

    fn latest_code(&self) -> &str {
        self.fragments.latest()
    }
}
