//! Injected snapshot fragments
//!
//! The style block, attribution banner, and control script the
//! rewriter inserts into every document snapshot. The style rules and
//! the script's heuristics are deliberately pattern-based: they clear
//! the common scroll-lock and overlay idioms, not every possible one.

// Macro form so the ids can be spliced into the const fragments below.
macro_rules! style_block_id {
    () => {
        "byepass-scroll"
    };
}
macro_rules! control_script_id {
    () => {
        "byepass-nav"
    };
}

/// Element id of the injected scroll-unlock style block
pub const STYLE_BLOCK_ID: &str = style_block_id!();

/// Element id of the injected control script
pub const CONTROL_SCRIPT_ID: &str = control_script_id!();

/// Style block appended at the end of head so it wins cascade order.
/// Forces natural document flow on common app-root selectors, clears
/// known scroll-lock markers, and hides dialog/modal/overlay/consent
/// patterns.
pub const SCROLL_UNLOCK_STYLE: &str = concat!(
    "<style id=\"",
    style_block_id!(),
    "\">\n",
    r##"html,body{margin:0!important;padding:0!important;height:auto!important;min-height:100vh!important;overflow:auto!important;}
html{scroll-behavior:auto!important;}
body{overflow-y:auto!important;-webkit-overflow-scrolling:touch;}
#root,#app,#__next,main,.app,.page,.layout,body>div:first-child{height:auto!important;min-height:100vh!important;overflow:auto!important;}
.overflow-hidden,.no-scroll,.modal-open,[data-scroll-lock],[data-lenis-smooth],[data-lenis-prevent],[data-scroll-lock-saved-overflow]{overflow:auto!important;}
*{overscroll-behavior:auto!important;}
/* Hide common overlays/popups/consent banners */
[role="dialog"], [aria-modal="true"], dialog, [data-modal], [data-overlay],
.modal, .dialog, .overlay, .backdrop, .popup,
[class*="cookie" i], [id*="cookie" i], [class*="consent" i], [id*="consent" i], [class*="gdpr" i], [id*="gdpr" i]{
  display:none !important;
}
</style>"##
);

/// The one script a snapshot is allowed to carry. Re-applies the
/// unlock/overlay heuristics by live DOM measurement (static CSS cannot
/// catch overlays reintroduced after load) and routes every anchor
/// click back through the capture entry point so navigation never
/// escapes the sandbox.
pub const CONTROL_SCRIPT: &str = concat!(
    "<script id=\"",
    control_script_id!(),
    "\">",
    r##"(function(){try{
function unlock(){try{
  var de=document.documentElement, b=document.body; if(!de||!b) return;
  de.style.overflow='auto'; b.style.overflow='auto';
  if(b.classList){['overflow-hidden','no-scroll','modal-open'].forEach(function(c){try{b.classList.remove(c)}catch(_){}})}
  var vh=window.innerHeight;
  var roots=['#root','#app','#__next','main','body>div:first-child'];
  roots.forEach(function(sel){var el=document.querySelector(sel); if(!el) return; var cs=getComputedStyle(el);
    if(cs.position==='fixed' && cs.top==='0px' && cs.bottom==='0px'){el.style.position='static'}
    if((cs.height===vh+'px' || cs.maxHeight===vh+'px') || cs.overflow==='hidden' || cs.overflowY==='hidden'){
      el.style.height='auto'; el.style.minHeight='100%'; el.style.overflow='auto'; el.style.overflowY='auto';
    }
  });
}catch(_){}}
function removeOverlays(){try{
  var vw=window.innerWidth, vh=window.innerHeight;
  var selectors='[role=\'dialog\'],[aria-modal=\'true\'],dialog,[data-modal],[data-overlay],.modal,.dialog,.overlay,.backdrop,.popup,[class*=\'cookie\' i],[id*=\'cookie\' i],[class*=\'consent\' i],[id*=\'consent\' i],[class*=\'gdpr\' i],[id*=\'gdpr\' i]';
  document.querySelectorAll(selectors).forEach(function(el){ try{ el.remove(); }catch(_){ try{ el.style.display='none'; }catch(__){} } });
  Array.prototype.slice.call(document.body.querySelectorAll('div,section,aside,dialog,header,footer')).forEach(function(el){
    try{
      var r=el.getBoundingClientRect(); if(!r || r.width===0 || r.height===0) return;
      var cs=getComputedStyle(el);
      var zi=parseInt(cs.zIndex,10); if(isNaN(zi)) zi=0;
      var fixedOrSticky=(cs.position==='fixed' || cs.position==='sticky');
      var covers = (r.width>=vw*0.6 && r.height>=vh*0.6) || (r.top<=5 && r.left<=5 && (Math.abs((vw-r.right))<=5 || Math.abs((vh-r.bottom))<=5));
      if(fixedOrSticky && (zi>=1000 || covers)){
        el.remove();
      }
    }catch(_){}
  });
}catch(_){}}
document.addEventListener('DOMContentLoaded', unlock);
setTimeout(unlock, 0); setTimeout(unlock, 500); setTimeout(unlock, 1500); setInterval(unlock, 3000);
document.addEventListener('DOMContentLoaded', removeOverlays);
setTimeout(removeOverlays, 0); setTimeout(removeOverlays, 500); setTimeout(removeOverlays, 1500); setInterval(removeOverlays, 3000);
document.addEventListener('click',function(e){var t=e.target&&e.target.closest?e.target.closest('a[href]'):null;if(!t)return;var h=t.getAttribute('href');if(!h||h.startsWith('#')||/^javascript:/i.test(h))return;e.preventDefault();var abs=new URL(h,document.baseURI).href;window.top.location.href='/?url='+encodeURIComponent(abs)+'&type=html';},true);
}catch(_){}})();</script>"##
);

/// Build the attribution banner inserted at the top of the body. The
/// inline `all:initial` reset and max z-index keep it visible above
/// whatever the page styles throw at it.
pub fn attribution_banner(original_url: &str) -> String {
    // encode_attribute would hex-escape the whole URL; the banner needs
    // it human-readable, so escape just the HTML-significant characters.
    let href = htmlescape::encode_minimal(original_url).replace('"', "&quot;");
    let label = htmlescape::encode_minimal(original_url);
    format!(
        "\n<div style=\"all:initial; display:block; box-sizing:border-box; width:100%; \
         background:#fffbdd; color:#111; border-bottom:1px solid rgba(0,0,0,.1); \
         font: 13px/1.4 system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial, sans-serif; \
         padding:8px 12px; position:sticky; top:0; z-index:2147483647;\">\
         Archived snapshot of <a href=\"{href}\" style=\"color:#0366d6;\">{label}</a>. \
         Scripts removed for safety.</div>\n"
    )
}
